use std::path::Path;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::Plot;

use megasena_analysis::config::AnalysisConfig;
use megasena_analysis::cycle::{ClosedCycle, CycleReport, CycleStatistics};
use megasena_analysis::delay::{DelayReport, NumberDelay};
use megasena_analysis::frequency::{FrequencyEntry, FrequencyTable};
use megasena_analysis::summary::Typical;
use megasena_data::load::LoadResult;

const THERMOMETER_WIDTH: usize = 50;
const GRID_COLUMNS: usize = 10;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

fn fmt_opt_f64(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:.1}"))
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn format_typical(typical: Option<Typical>) -> String {
    match typical {
        Some(t @ Typical::Mode(_)) => format!("{t} (moda)"),
        Some(t @ Typical::Median(_)) => format!("{t} (mediana)"),
        None => "—".to_string(),
    }
}

pub fn display_load_summary(result: &LoadResult, path: &Path) {
    println!("Base {} carregada :", path.display());
    println!("  Linhas lidas      : {}", result.total_records);
    println!("  Sorteios válidos  : {}", result.draws.len());
    if result.discarded > 0 {
        println!("  Linhas descartadas: {}", result.discarded);
    }
    println!("  Colunas de bolas  : {}", result.ball_columns.join(", "));
}

pub fn display_selection(bounds: Option<(u32, u32)>, count: usize) {
    match bounds {
        Some((first, last)) => println!(
            "\n🔢 Bloco selecionado : concursos de {} a {} ({} sorteios)",
            first, last, count
        ),
        None => println!("\n⚠️  Nenhum sorteio encontrado nesse bloco."),
    }
}

pub fn display_delays(report: &DelayReport, top: usize) {
    println!("\n📌 Atrasos por dezena (sem atraso = 0)\n");
    if report.entries.is_empty() {
        println!("Nenhuma dezena atrasada.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        "Dezena",
        "Atraso atual",
        "Vezes Top1",
        "Atraso Top1 típico",
        "Top1 mín",
        "Top1 máx",
    ]);
    for e in &report.entries {
        table.add_row(vec![
            format!("{:02}", e.number),
            e.current_delay.to_string(),
            e.leadership_count.to_string(),
            format_typical(e.typical_top1),
            fmt_opt(e.min_top1),
            fmt_opt(e.max_top1),
        ]);
    }
    println!("{table}");

    let leaders: Vec<u8> = report.top(top).iter().map(|e| e.number).collect();
    println!("\n🔝 Top {} maiores atrasos : {}", leaders.len(), format_numbers(&leaders));
}

/// Text bar over `0..=scale`: the historical Top1 band as `▒`, the current
/// delay as `█`, the rest as `░`. Values past the scale are pinned to it.
pub fn thermometer_bar(min: u32, max: u32, current: u32, scale: u32, width: usize) -> String {
    let scale = scale.max(1);
    let slot = |v: u32| -> usize {
        let v = v.min(scale) as usize;
        (v * (width - 1)) / scale as usize
    };
    let (lo, hi) = (slot(min.min(max)), slot(max));
    let marker = slot(current);

    (0..width)
        .map(|i| {
            if i == marker {
                '█'
            } else if i >= lo && i <= hi {
                '▒'
            } else {
                '░'
            }
        })
        .collect()
}

pub fn display_thermometer(entry: &NumberDelay, scale: u32) {
    println!("\n📏 Termômetro de atraso da dezena {:02}\n", entry.number);
    let (Some(min), Some(max)) = (entry.min_top1, entry.max_top1) else {
        println!(
            "A dezena {:02} nunca liderou como Top1 no bloco selecionado : \
             não há faixa histórica para mostrar.",
            entry.number
        );
        return;
    };

    let bar = thermometer_bar(min, max, entry.current_delay, scale, THERMOMETER_WIDTH);
    println!("0 {bar} {scale}");
    println!("  ▒ faixa histórica Top1 : {} a {} concursos", min, max);
    println!("  █ atraso atual         : {} concursos", entry.current_delay);
}

fn ranking_cell(entries: &[FrequencyEntry], i: usize) -> (String, String) {
    entries
        .get(i)
        .map(|e| (format!("{:02}", e.number), e.count.to_string()))
        .unwrap_or_default()
}

pub fn display_frequency(table: &FrequencyTable, top: usize) {
    println!("\n📈 Frequência das dezenas ({} sorteios)\n", table.draw_count);

    let mut grid = new_table();
    grid.set_header(vec!["Dezena", "Frequência"]);
    for e in &table.entries {
        grid.add_row(vec![format!("{:02}", e.number), e.count.to_string()]);
    }
    println!("{grid}");

    let most = table.most_frequent(top);
    let least = table.least_frequent(top);

    println!("\n🔝 Top {} mais e menos sorteadas\n", most.len());
    let mut ranking = new_table();
    ranking.set_header(vec!["#", "Mais sorteada", "Freq.", "Menos sorteada", "Freq."]);
    for i in 0..most.len().max(least.len()) {
        let (most_n, most_c) = ranking_cell(&most, i);
        let (least_n, least_c) = ranking_cell(&least, i);
        ranking.add_row(vec![
            Cell::new(i + 1),
            Cell::new(most_n).fg(Color::Green),
            Cell::new(most_c),
            Cell::new(least_n).fg(Color::Red),
            Cell::new(least_c),
        ]);
    }
    println!("{ranking}");
}

pub fn display_cycles(report: &CycleReport, stats: &CycleStatistics) {
    let open = &report.open;
    println!("\n🔄 Ciclo atual #{}\n", open.index);
    println!("  Início do ciclo     : {}", open.start_contest);
    println!("  Sorteio atual       : {}", fmt_opt(open.last_contest));
    println!("  Sorteios no ciclo   : {}", open.elapsed());
    println!("  Faltam sair         : {}", open.missing.len());

    let total = open.seen.len() + open.missing.len();
    let mut grid = Table::new();
    grid.load_preset(UTF8_FULL);
    for row in (1..=total as u8).collect::<Vec<_>>().chunks(GRID_COLUMNS) {
        grid.add_row(row.iter().map(|&n| {
            let cell = Cell::new(format!("{:02}", n));
            if open.missing.contains(&n) {
                cell.fg(Color::Red)
            } else {
                cell.fg(Color::DarkGrey)
            }
        }));
    }
    println!("\n🧩 Situação das dezenas no ciclo #{} (vermelho = falta)\n", open.index);
    println!("{grid}");
    if !open.missing.is_empty() {
        println!("\n🚨 Dezenas que faltam sair : {}", format_numbers(&open.missing));
    }

    println!("\n📚 Histórico e estatísticas de duração\n");
    if report.closed.is_empty() {
        println!("Ainda não há ciclos fechados para calcular estatísticas.");
        return;
    }

    let (mode_label, mode_value) = match &stats.modes {
        Some(modes) => (
            "Moda (mais frequente)",
            modes.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", "),
        ),
        None => ("Moda (usando mediana)", fmt_opt_f64(stats.median)),
    };
    let mut summary = new_table();
    summary.set_header(vec!["Ciclos fechados", "Média", "Mediana", mode_label]);
    summary.add_row(vec![
        stats.closed_count.to_string(),
        fmt_opt_f64(stats.mean),
        fmt_opt_f64(stats.median),
        mode_value,
    ]);
    println!("{summary}");

    let mut history = new_table();
    history.set_header(vec!["Ciclo", "Início", "Fim", "Sorteios"]);
    for c in report.closed.iter().rev() {
        history.add_row(vec![
            c.index.to_string(),
            c.start_contest.to_string(),
            c.end_contest.to_string(),
            c.length.to_string(),
        ]);
    }
    println!("{history}");

    display_cycle_chart(report);
}

/// Bars of cycle length per cycle index, with both axes anchored at zero so
/// equal lengths still draw visible bars.
fn cycle_chart_layout(closed: &[ClosedCycle]) -> (Vec<(f32, f32)>, f32, f32) {
    let points: Vec<(f32, f32)> = closed
        .iter()
        .map(|c| (c.index as f32, c.length as f32))
        .collect();
    let x_max = closed.len() as f32 + 1.0;
    let max_len = closed.iter().map(|c| c.length).max().unwrap_or(0).max(1);
    (points, x_max, max_len as f32 * 1.1)
}

fn display_cycle_chart(report: &CycleReport) {
    let (points, x_max, y_max) = cycle_chart_layout(&report.closed);

    println!("\nDuração de cada ciclo (sorteios)");
    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 0.0, x_max, 0.0, y_max);
    println!("{}", chart.lineplot(&shape));
}

pub fn display_config(config: &AnalysisConfig) {
    let mut table = new_table();
    table.set_header(vec!["Parâmetro", "Valor"]);
    table.add_row(vec!["pool_size".to_string(), config.pool_size.to_string()]);
    table.add_row(vec!["top".to_string(), config.top.to_string()]);
    table.add_row(vec!["strict_order".to_string(), config.strict_order.to_string()]);
    table.add_row(vec![
        "thermometer_scale".to_string(),
        config.thermometer_scale.to_string(),
    ]);
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena_analysis::cycle::compute_cycles;
    use megasena_data::models::{make_test_draws, Pool};

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[3, 15, 60]), "03 - 15 - 60");
        assert_eq!(format_numbers(&[]), "");
    }

    #[test]
    fn test_format_typical() {
        assert_eq!(format_typical(Some(Typical::Mode(7))), "7 (moda)");
        assert_eq!(format_typical(Some(Typical::Median(4.5))), "4.5 (mediana)");
        assert_eq!(format_typical(None), "—");
    }

    #[test]
    fn test_thermometer_layout() {
        let bar = thermometer_bar(2, 4, 8, 10, 11);
        assert_eq!(bar.chars().count(), 11);
        assert_eq!(bar, "░░▒▒▒░░░█░░");
    }

    #[test]
    fn test_cycle_chart_single_cycle_has_height() {
        let report = compute_cycles(&make_test_draws(12), Pool::MEGA_SENA, 1);
        let (points, x_max, y_max) = cycle_chart_layout(&report.closed);
        assert_eq!(points, vec![(1.0, 10.0)]);
        assert!(x_max > 1.0);
        assert!(y_max > 10.0);
    }

    #[test]
    fn test_cycle_chart_equal_lengths_from_zero() {
        let report = compute_cycles(&make_test_draws(35), Pool::MEGA_SENA, 1);
        let (points, x_max, y_max) = cycle_chart_layout(&report.closed);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|&(_, len)| len > 0.0 && len < y_max));
        assert_eq!(x_max, 4.0);
    }

    #[test]
    fn test_cycle_chart_without_cycles() {
        let (points, _, y_max) = cycle_chart_layout(&[]);
        assert!(points.is_empty());
        assert!(y_max > 0.0);
    }

    #[test]
    fn test_thermometer_clamps_to_scale() {
        let bar = thermometer_bar(50, 250, 300, 100, 11);
        assert_eq!(bar, "░░░░░▒▒▒▒▒█");
    }
}
