use std::io as stdio;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use retirement_planner::core::{
    SipParams, StepUpMode, project_sip, required_monthly_sip, validate_sip, validate_sip_target,
};
use retirement_planner::error::PlannerError;
use retirement_planner::io::{
    ConfigFile, ConsoleSummary, CsvReport, InteractivePrompt, ProfileSource, ProjectionRenderer,
    TextChartReport, run_plan,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliStepUpMode {
    Compounded,
    Fixed,
}

impl From<CliStepUpMode> for StepUpMode {
    fn from(value: CliStepUpMode) -> Self {
        match value {
            CliStepUpMode::Compounded => StepUpMode::Compounded,
            CliStepUpMode::Fixed => StepUpMode::Fixed,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "retirement-planner",
    about = "Year-by-year retirement corpus projection with child education and marriage goals"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a profile read from a config file, or prompt for one.
    Plan {
        #[arg(long, help = "JSON or YAML profile; prompts interactively when omitted")]
        config: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        #[arg(long, help = "Print the summary only; skip CSV and chart files")]
        no_files: bool,
    },
    /// Serve the web form and JSON API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Project a monthly SIP, or solve the instalment for a target.
    Sip {
        #[arg(long, help = "Target corpus; prints the required monthly instalment")]
        target: Option<f64>,
        #[arg(long, default_value_t = 10_000.0)]
        monthly: f64,
        #[arg(long)]
        years: u32,
        #[arg(long, default_value_t = 0)]
        extra_months: u32,
        #[arg(long, help = "Expected annual return in percent, e.g. 12")]
        rate: f64,
        #[arg(long, default_value_t = 0.0, help = "Yearly instalment step-up in percent")]
        step_up: f64,
        #[arg(long, value_enum, default_value_t = CliStepUpMode::Compounded)]
        step_up_mode: CliStepUpMode,
        #[arg(long, default_value_t = 0.0)]
        initial: f64,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Plan {
            config,
            output_dir,
            no_files,
        } => plan(config, output_dir, no_files),
        Command::Serve { port } => retirement_planner::api::run_http_server(port)
            .await
            .map_err(PlannerError::from),
        Command::Sip {
            target,
            monthly,
            years,
            extra_months,
            rate,
            step_up,
            step_up_mode,
            initial,
        } => sip(
            target,
            SipParams {
                monthly_investment: monthly,
                years,
                extra_months,
                annual_return: rate,
                yearly_step_up: step_up,
                step_up_mode: step_up_mode.into(),
                initial_investment: initial,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn plan(config: Option<PathBuf>, output_dir: PathBuf, no_files: bool) -> Result<(), PlannerError> {
    let mut renderers: Vec<Box<dyn ProjectionRenderer>> = Vec::new();
    if !no_files {
        renderers.push(Box::new(CsvReport::new(&output_dir)));
        renderers.push(Box::new(TextChartReport::new(&output_dir)));
    }
    renderers.push(Box::new(ConsoleSummary::new(stdio::stdout())));

    let mut source: Box<dyn ProfileSource> = match config {
        Some(path) => Box::new(ConfigFile::new(path)),
        None => Box::new(InteractivePrompt::new(stdio::stdin().lock(), stdio::stdout())),
    };
    run_plan(source.as_mut(), &mut renderers)?;
    Ok(())
}

fn sip(target: Option<f64>, mut params: SipParams) -> Result<(), PlannerError> {
    validate_sip(&params)?;
    if let Some(target) = target {
        let target = validate_sip_target(target)?;
        let monthly = required_monthly_sip(target, &params);
        println!("Required monthly SIP for {target:.2}: {monthly:.2}");
        params.monthly_investment = monthly;
    }

    let projection = project_sip(&params);
    println!(
        "{:>4} {:>16} {:>16} {:>16} {:>16}",
        "Year", "Instalment", "Invested", "Corpus", "Returns"
    );
    for year in &projection.years {
        println!(
            "{:>4} {:>16.2} {:>16.2} {:>16.2} {:>16.2}",
            year.year, year.monthly_investment, year.total_invested, year.corpus, year.returns
        );
    }
    println!("Final amount: {:.2}", projection.final_amount);
    println!("Total invested: {:.2}", projection.total_invested);
    println!("Total returns: {:.2}", projection.total_returns);
    Ok(())
}
