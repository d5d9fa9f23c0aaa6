use std::process;

use color_eyre::eyre::Result;
use log::{debug, error};
use structopt::clap::AppSettings;
use structopt::StructOpt;

use ezres::{
    DisplayBackend, DisplayError, DisplayMode, DisplayMutator, Language, Messages, ModeCatalog,
    ModeValidator, ParseModeError, SystemBackend, ValidationOutcome,
};

const SUCCESS: i32 = 0;
const FAILURE: i32 = 1;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "ezres",
    about = "Change the resolution and scaling of the primary display",
    global_settings = &[AppSettings::DisableHelpFlags, AppSettings::DisableVersion, AppSettings::AllowNegativeNumbers]
)]
struct Opt {
    /// Show help
    #[structopt(short = "h", long = "help")]
    help: bool,

    /// Skip checking the resolution against the modes the driver reports
    #[structopt(short = "f", long = "force")]
    force: bool,

    /// Set resolution: <width> <height> [refresh]
    #[structopt(short = "r", long = "resolution", min_values = 2, max_values = 3)]
    resolution: Option<Vec<String>>,

    /// Set scaling in percent (100-500)
    #[structopt(short = "s", long = "scale")]
    scale: Option<String>,

    /// Show the current settings
    #[structopt(short = "l", long = "list")]
    list: bool,

    /// Show all available resolutions
    #[structopt(short = "a", long = "all")]
    all: bool,

    /// Print -l and -a output as JSON
    #[structopt(long)]
    json: bool,

    /// Output language, `en` or `zh`. Defaults to the user interface language
    #[structopt(long)]
    lang: Option<Language>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let backend = SystemBackend::new();
    let code = match Opt::from_iter_safe(std::env::args_os()) {
        Ok(opt) => run(&opt, &backend)?,
        Err(err) => {
            debug!("{}", err);
            let messages = Messages::new(detect_language(&backend));
            println!("{}", messages.invalid_command());
            println!("{}", messages.usage());
            FAILURE
        }
    };

    process::exit(code)
}

fn detect_language<B: DisplayBackend>(backend: &B) -> Language {
    if backend.prefers_chinese() {
        Language::Zh
    } else {
        Language::En
    }
}

fn run<B: DisplayBackend>(opt: &Opt, backend: &B) -> Result<i32> {
    let messages = Messages::new(opt.lang.unwrap_or_else(|| detect_language(backend)));

    if opt.help {
        println!("{}", messages.usage());
        return Ok(SUCCESS);
    }
    if opt.list {
        return show_current(backend, &messages, opt.json);
    }
    if opt.all {
        return show_all(backend, &messages, opt.json);
    }
    if let Some(args) = &opt.resolution {
        return Ok(set_resolution(backend, &messages, args, opt.force));
    }
    if let Some(percentage) = &opt.scale {
        return Ok(set_scaling(backend, &messages, percentage));
    }

    if opt.force || opt.json || opt.lang.is_some() {
        println!("{}", messages.invalid_command());
    }
    println!("{}", messages.usage());
    Ok(FAILURE)
}

fn show_current<B: DisplayBackend>(backend: &B, messages: &Messages, json: bool) -> Result<i32> {
    let mode = match DisplayMutator::new(backend).current_mode() {
        Ok(mode) => mode,
        Err(err) => {
            error!("{}", err);
            return Ok(FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&mode)?);
    } else {
        println!("{}", messages.current_resolution(&mode));
    }
    Ok(SUCCESS)
}

fn show_all<B: DisplayBackend>(backend: &B, messages: &Messages, json: bool) -> Result<i32> {
    let catalog = ModeCatalog::new(backend);

    if json {
        let modes: Vec<DisplayMode> = catalog.enumerate().collect();
        println!("{}", serde_json::to_string_pretty(&modes)?);
    } else {
        println!("{}", messages.available_resolutions());
        for mode in catalog.enumerate() {
            println!("{}", mode);
        }
    }
    Ok(SUCCESS)
}

fn set_resolution<B: DisplayBackend>(backend: &B, messages: &Messages, args: &[String], force: bool) -> i32 {
    let requested = match DisplayMode::from_args(args) {
        Ok(mode) => mode,
        Err(ParseModeError::NotPositive) => {
            println!("{}", messages.invalid_resolution_values());
            return FAILURE;
        }
        Err(err) => {
            debug!("{}", err);
            println!("{}", messages.invalid_number());
            return FAILURE;
        }
    };

    if force {
        println!("{}", messages.force_warning());
    } else {
        match ModeValidator::new(backend).validate(requested) {
            ValidationOutcome::Valid => {}
            ValidationOutcome::ResolutionUnsupported => {
                println!("{}", messages.resolution_unsupported());
                return FAILURE;
            }
            ValidationOutcome::RefreshRateUnsupported => {
                println!("{}", messages.refresh_rate_unsupported());
                return FAILURE;
            }
        }
    }

    println!("{}", messages.setting_resolution(&requested));
    match DisplayMutator::new(backend).apply_resolution(requested.resolution, requested.refresh_rate) {
        Ok(()) => {
            println!("{}", messages.resolution_success());
            SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            println!("{}", messages.resolution_failed());
            FAILURE
        }
    }
}

fn set_scaling<B: DisplayBackend>(backend: &B, messages: &Messages, percentage: &str) -> i32 {
    let percentage: i32 = match percentage.trim().parse() {
        Ok(percentage) => percentage,
        Err(err) => {
            debug!("{}", err);
            println!("{}", messages.invalid_number());
            return FAILURE;
        }
    };

    println!("{}", messages.setting_scaling(percentage));
    match DisplayMutator::new(backend).apply_scaling(percentage) {
        Ok(scaling) => {
            println!("{}", messages.scaling_success(scaling));
            SUCCESS
        }
        Err(DisplayError::ScalingOutOfRange(_)) => {
            println!("{}", messages.scaling_range());
            println!("{}", messages.scaling_failed());
            FAILURE
        }
        Err(err) => {
            error!("{}", err);
            println!("{}", messages.scaling_failed());
            FAILURE
        }
    }
}
