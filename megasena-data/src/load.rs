use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::{info, warn};

use crate::models::{validate_draw, DrawRecord, Pool, PICK_COUNT};

pub const CONTEST_COLUMN: &str = "Concurso";
pub const DATE_COLUMN: &str = "Data";
const BALL_PREFIX: &str = "bola";
const DELIMITERS: [u8; 2] = [b',', b';'];

pub struct LoadResult {
    /// Sorted ascending by contest id, ids unique.
    pub draws: Vec<DrawRecord>,
    pub ball_columns: Vec<String>,
    pub total_records: u32,
    pub discarded: u32,
}

struct Columns {
    contest: usize,
    date: usize,
    balls: Vec<(usize, String)>,
}

fn clean_header(h: &str) -> &str {
    h.trim_start_matches('\u{feff}').trim()
}

fn locate_columns(headers: &csv::StringRecord) -> Option<Columns> {
    let position = |name: &str| headers.iter().position(|h| clean_header(h) == name);
    let contest = position(CONTEST_COLUMN)?;
    let date = position(DATE_COLUMN)?;
    let balls = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| clean_header(h).to_lowercase().starts_with(BALL_PREFIX))
        .map(|(i, h)| (i, clean_header(h).to_string()))
        .collect();
    Some(Columns {
        contest,
        date,
        balls,
    })
}

/// Integer coercion that also accepts integral floats such as `"2750.0"`.
pub fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Day-first dates, as published (`17/02/2026`), with ISO as fallback.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

fn parse_record(record: &csv::StringRecord, columns: &Columns, pool: Pool) -> Result<DrawRecord> {
    let raw_contest = record.get(columns.contest).unwrap_or_default();
    let contest_id = parse_integer(raw_contest)
        .and_then(|v| u32::try_from(v).ok())
        .with_context(|| format!("Concurso inválido: '{}'", raw_contest))?;

    let date = record.get(columns.date).and_then(parse_date);

    let mut numbers = Vec::with_capacity(PICK_COUNT);
    for (idx, name) in &columns.balls {
        let raw = record.get(*idx).unwrap_or_default().trim();
        if raw.is_empty() {
            continue;
        }
        let n = parse_integer(raw)
            .and_then(|v| u8::try_from(v).ok())
            .with_context(|| format!("Valor inválido em {}: '{}'", name, raw))?;
        numbers.push(n);
    }
    validate_draw(&numbers, pool)
        .with_context(|| format!("Concurso {}", contest_id))?;

    let mut arr = [0u8; PICK_COUNT];
    arr.copy_from_slice(&numbers);
    Ok(DrawRecord {
        contest_id,
        date,
        numbers: arr,
    })
}

fn parse_with_delimiter(content: &str, delimiter: u8, pool: Pool) -> Result<Option<LoadResult>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("Cabeçalho ilegível")?.clone();
    let Some(columns) = locate_columns(&headers) else {
        return Ok(None);
    };
    if columns.balls.is_empty() {
        bail!(
            "A base precisa ter as colunas `{}`, `{}` e colunas de bolas (`Bola1`, `Bola2`, ...)",
            CONTEST_COLUMN,
            DATE_COLUMN
        );
    }

    let mut result = LoadResult {
        draws: Vec::new(),
        ball_columns: columns.balls.iter().map(|(_, name)| name.clone()).collect(),
        total_records: 0,
        discarded: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record, &columns, pool) {
                Ok(draw) => result.draws.push(draw),
                Err(e) => {
                    warn!("Linha {} descartada : {:#}", result.total_records, e);
                    result.discarded += 1;
                }
            },
            Err(e) => {
                warn!("Erro de leitura na linha {} : {}", result.total_records, e);
                result.discarded += 1;
            }
        }
    }

    result.draws.sort_by_key(|d| d.contest_id);
    if let Some(pair) = result
        .draws
        .windows(2)
        .find(|w| w[0].contest_id == w[1].contest_id)
    {
        bail!("Concurso duplicado : {}", pair[0].contest_id);
    }

    Ok(Some(result))
}

/// Parses a results table, sniffing `,` then `;` as field separator.
pub fn load_from_reader<R: Read>(mut reader: R, pool: Pool) -> Result<LoadResult> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("Impossível ler o conteúdo CSV")?;

    for delimiter in DELIMITERS {
        if let Some(result) = parse_with_delimiter(&content, delimiter, pool)? {
            info!(
                "{} sorteios carregados ({} linhas, {} descartadas), separador '{}'",
                result.draws.len(),
                result.total_records,
                result.discarded,
                delimiter as char
            );
            return Ok(result);
        }
    }
    bail!(
        "Colunas obrigatórias ausentes : `{}` e `{}`",
        CONTEST_COLUMN,
        DATE_COLUMN
    )
}

pub fn load_csv(path: &Path, pool: Pool) -> Result<LoadResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossível abrir {:?}", path))?;
    load_from_reader(file, pool).with_context(|| format!("Arquivo {:?}", path))
}
