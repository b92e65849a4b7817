mod display;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;

use megasena_analysis::analyze;
use megasena_analysis::config::AnalysisConfig;
use megasena_analysis::cycle::{compute_cycles, compute_statistics, CycleReport, CycleStatistics};
use megasena_analysis::delay::compute_delays;
use megasena_analysis::frequency::compute_frequency;
use megasena_data::load::load_csv;
use megasena_data::models::{DrawRecord, Pool};
use megasena_data::range::{check_strictly_increasing, contest_bounds, select_range};

use crate::display::{
    display_config, display_cycles, display_delays, display_frequency, display_load_summary,
    display_selection, display_thermometer,
};

#[derive(Parser)]
#[command(name = "megasena", about = "Atrasos, frequências e ciclos das dezenas da Mega-Sena")]
struct Cli {
    /// Arquivo de configuração JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct BlockArgs {
    /// Arquivo CSV com os resultados (colunas Concurso, Data, Bola1..Bola6)
    #[arg(short, long, default_value = "RESULTADOS_MEGASENA.csv")]
    file: PathBuf,

    /// Primeiro concurso do bloco (inclusivo)
    #[arg(long)]
    from: Option<u32>,

    /// Último concurso do bloco (inclusivo)
    #[arg(long)]
    to: Option<u32>,

    /// Tamanho dos rankings
    #[arg(short, long)]
    top: Option<usize>,

    /// Recusar concursos fora de ordem em vez de corrigir o intervalo
    #[arg(long)]
    strict_order: bool,

    /// Saída em JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Atraso atual de cada dezena e histórico de liderança (Top1)
    Delays {
        #[command(flatten)]
        block: BlockArgs,

        /// Dezena exibida no termômetro (padrão : a mais atrasada)
        #[arg(short, long)]
        number: Option<u8>,
    },

    /// Frequência de cada dezena no bloco
    Frequency {
        #[command(flatten)]
        block: BlockArgs,
    },

    /// Ciclo atual e estatísticas dos ciclos fechados
    Cycles {
        #[command(flatten)]
        block: BlockArgs,
    },

    /// Atrasos, frequências e ciclos de uma vez
    Summary {
        #[command(flatten)]
        block: BlockArgs,
    },

    /// Exibir ou salvar a configuração efetiva
    Config {
        /// Gravar a configuração neste arquivo
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

struct Block {
    draws: Vec<DrawRecord>,
    pool: Pool,
    default_cycle_start: u32,
    json: bool,
}

impl Block {
    /// Nothing to analyse in table mode; JSON still emits the empty report.
    fn is_silent_empty(&self) -> bool {
        self.draws.is_empty() && !self.json
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Command::Delays { block, number } => cmd_delays(&mut config, &block, number),
        Command::Frequency { block } => cmd_frequency(&mut config, &block),
        Command::Cycles { block } => cmd_cycles(&mut config, &block),
        Command::Summary { block } => cmd_summary(&mut config, &block),
        Command::Config { save } => cmd_config(&config, save),
    }
}

fn load_block(config: &mut AnalysisConfig, args: &BlockArgs) -> Result<Block> {
    if let Some(top) = args.top {
        config.top = top;
    }
    config.strict_order |= args.strict_order;
    let pool = config.pool()?;

    let loaded = load_csv(&args.file, pool)?;
    if !args.json {
        display_load_summary(&loaded, &args.file);
    }

    let selected = select_range(&loaded.draws, args.from, args.to)?;
    if config.strict_order {
        check_strictly_increasing(selected)?;
    }
    let bounds = contest_bounds(selected);
    info!(
        "Bloco {:?}..{:?} : {} sorteios",
        args.from,
        args.to,
        selected.len()
    );
    if !args.json {
        display_selection(bounds, selected.len());
    }

    Ok(Block {
        draws: selected.to_vec(),
        pool,
        default_cycle_start: args.from.unwrap_or(1),
        json: args.json,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Falha na serialização JSON")?;
    println!("{json}");
    Ok(())
}

fn cmd_delays(config: &mut AnalysisConfig, args: &BlockArgs, number: Option<u8>) -> Result<()> {
    let block = load_block(config, args)?;
    if block.is_silent_empty() {
        return Ok(());
    }
    let report = compute_delays(&block.draws, block.pool);
    if block.json {
        return print_json(&report);
    }

    display_delays(&report, config.top);
    let chosen = match number {
        Some(n) => report.get(n),
        None => report.most_delayed(),
    };
    match (chosen, number) {
        (Some(entry), _) => display_thermometer(entry, config.thermometer_scale),
        (None, Some(n)) => println!("\nA dezena {:02} não está atrasada neste bloco.", n),
        (None, None) => {}
    }
    Ok(())
}

fn cmd_frequency(config: &mut AnalysisConfig, args: &BlockArgs) -> Result<()> {
    let block = load_block(config, args)?;
    if block.is_silent_empty() {
        return Ok(());
    }
    let table = compute_frequency(&block.draws, block.pool);
    if block.json {
        return print_json(&table);
    }
    display_frequency(&table, config.top);
    Ok(())
}

#[derive(Serialize)]
struct CyclesOutput<'a> {
    #[serde(flatten)]
    report: &'a CycleReport,
    statistics: &'a CycleStatistics,
}

fn cmd_cycles(config: &mut AnalysisConfig, args: &BlockArgs) -> Result<()> {
    let block = load_block(config, args)?;
    if block.is_silent_empty() {
        return Ok(());
    }
    let report = compute_cycles(&block.draws, block.pool, block.default_cycle_start);
    let stats = compute_statistics(&report.closed);
    if block.json {
        return print_json(&CyclesOutput {
            report: &report,
            statistics: &stats,
        });
    }
    display_cycles(&report, &stats);
    Ok(())
}

fn cmd_summary(config: &mut AnalysisConfig, args: &BlockArgs) -> Result<()> {
    let block = load_block(config, args)?;
    if block.is_silent_empty() {
        return Ok(());
    }
    let analysis = analyze(&block.draws, block.pool, block.default_cycle_start);
    if block.json {
        return print_json(&analysis);
    }

    display_delays(&analysis.delays, config.top);
    if let Some(entry) = analysis.delays.most_delayed() {
        display_thermometer(entry, config.thermometer_scale);
    }
    display_frequency(&analysis.frequency, config.top);
    display_cycles(&analysis.cycles, &analysis.cycle_statistics);
    Ok(())
}

fn cmd_config(config: &AnalysisConfig, save: Option<PathBuf>) -> Result<()> {
    display_config(config);
    if let Some(path) = save {
        config.save(&path)?;
        println!("\nConfiguração salva em {}", path.display());
    }
    Ok(())
}
