// src/services/csv_service.rs
// Leitura do CSV enviado pelo mentor e extração dos campos conhecidos.
// As linhas são mapas cabeçalho -> texto; só `CsvRow::normalize` converte
// esse mapa em campos tipados.
use crate::error::{AppError, AppResult};
use std::collections::HashMap;

/// Campos canónicos que sabemos ler do CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Class,
    Attendance,
    ScoreAverage,
    ProfileImageUrl,
}

impl Field {
    /// Cabeçalhos aceites, por ordem de preferência. A comparação é exata
    /// (maiúsculas contam): `ATTENDANCE` não é reconhecido.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name", "Name"],
            Field::Class => &["class", "Class"],
            Field::Attendance => &["attendance", "Attendance"],
            Field::ScoreAverage => &["score_average", "Score Average", "score"],
            Field::ProfileImageUrl => &["profile_image_url", "profileImageUrl"],
        }
    }
}

/// Uma linha de dados do CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    pub line: u64,
    cells: HashMap<String, String>,
}

/// Campos tipados extraídos de uma linha. Numéricos ausentes ou inválidos valem 0.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub line: u64,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub attendance: f64,
    pub score_average: f64,
    pub profile_image_url: Option<String>,
}

impl CsvRow {
    pub fn new(line: u64, cells: HashMap<String, String>) -> Self {
        CsvRow { line, cells }
    }

    /// Primeiro valor não vazio entre os aliases do campo.
    pub fn field(&self, field: Field) -> Option<&str> {
        field
            .aliases()
            .iter()
            .filter_map(|alias| self.cells.get(*alias))
            .map(String::as_str)
            .find(|value| !value.is_empty())
    }

    pub fn normalize(&self) -> NormalizedRow {
        let text = |field: Field| self.field(field).map(str::to_string);
        NormalizedRow {
            line: self.line,
            name: text(Field::Name),
            class_name: text(Field::Class),
            attendance: parse_decimal(self.field(Field::Attendance)),
            score_average: parse_decimal(self.field(Field::ScoreAverage)),
            profile_image_url: text(Field::ProfileImageUrl),
        }
    }
}

/// Lê o ficheiro inteiro em memória. O cabeçalho define as colunas, linhas em
/// branco (ou só com espaços) são ignoradas e cada célula é aparada. Um
/// registo com número de colunas diferente do cabeçalho invalida o ficheiro todo.
pub fn parse_csv(bytes: &[u8]) -> AppResult<Vec<CsvRow>> {
    let decoded = String::from_utf8_lossy(bytes);
    let text = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);

    // flexible: o número de colunas é verificado aqui, depois de descartar linhas em branco
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if is_blank_line(&record) {
            continue;
        }
        if record.len() != headers.len() {
            return Err(AppError::MalformedCsv(format!(
                "linha {} tem {} colunas, o cabeçalho tem {}",
                line,
                record.len(),
                headers.len()
            )));
        }
        // Cabeçalhos repetidos: o último ganha
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(CsvRow::new(line, cells));
    }

    tracing::debug!("CSV lido: {} colunas, {} linhas de dados", headers.len(), rows.len());
    Ok(rows)
}

// Uma linha só com espaços chega aqui como um único campo vazio
fn is_blank_line(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

/// Converte texto em número aproveitando o maior prefixo decimal válido
/// ("82%" -> 82, "7.5 pts" -> 7.5). Sem prefixo numérico, ou resultado não
/// finito, devolve 0.
pub fn parse_decimal(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    let mut has_digits = int_end > end;

    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        if has_digits || frac_end > int_end + 1 {
            has_digits = true;
            mantissa_end = frac_end;
        }
    }
    if !has_digits {
        return 0.0;
    }
    end = mantissa_end;

    // Expoente só conta se tiver dígitos
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        CsvRow::new(
            2,
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        )
    }

    #[test]
    fn first_non_empty_alias_wins() {
        let r = row(&[("score_average", ""), ("Score Average", "71"), ("score", "99")]);
        assert_eq!(r.field(Field::ScoreAverage), Some("71"));
    }

    #[test]
    fn alias_match_is_case_sensitive() {
        let r = row(&[("NAME", "Amy"), ("ATTENDANCE", "90")]);
        assert_eq!(r.field(Field::Name), None);
        assert_eq!(r.field(Field::Attendance), None);
    }

    #[test]
    fn score_aliases_resolve_to_same_value() {
        let a = row(&[("Score Average", "64.5")]).normalize();
        let b = row(&[("score", "64.5")]).normalize();
        assert_eq!(a.score_average, 64.5);
        assert_eq!(a.score_average, b.score_average);
    }

    #[test]
    fn unknown_headers_leave_numbers_at_zero() {
        let n = row(&[("Name", "Amy"), ("ScoreAvg", "88")]).normalize();
        assert_eq!(n.name.as_deref(), Some("Amy"));
        assert_eq!(n.score_average, 0.0);
        assert_eq!(n.attendance, 0.0);
        assert_eq!(n.class_name, None);
    }

    #[test]
    fn decimal_prefix_parsing() {
        assert_eq!(parse_decimal(Some("82")), 82.0);
        assert_eq!(parse_decimal(Some("82%")), 82.0);
        assert_eq!(parse_decimal(Some("  7.25 pts")), 7.25);
        assert_eq!(parse_decimal(Some(".5")), 0.5);
        assert_eq!(parse_decimal(Some("5.")), 5.0);
        assert_eq!(parse_decimal(Some("-12")), -12.0);
        assert_eq!(parse_decimal(Some("1e2")), 100.0);
        assert_eq!(parse_decimal(Some("3e")), 3.0);
        assert_eq!(parse_decimal(Some("abc")), 0.0);
        assert_eq!(parse_decimal(Some("-")), 0.0);
        assert_eq!(parse_decimal(Some(".")), 0.0);
        assert_eq!(parse_decimal(Some("")), 0.0);
        assert_eq!(parse_decimal(Some("1e999")), 0.0);
        assert_eq!(parse_decimal(None), 0.0);
    }

    #[test]
    fn parses_header_trims_cells_and_skips_blank_lines() {
        let csv = "name, class ,attendance\n  Amy , 9A ,82\n\nBen,9B,  70  \n";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field(Field::Name), Some("Amy"));
        assert_eq!(rows[0].field(Field::Class), Some("9A"));
        assert_eq!(rows[1].field(Field::Attendance), Some("70"));
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 4);
    }

    #[test]
    fn byte_order_mark_does_not_hide_first_header() {
        let csv = "\u{feff}name,class\nAmy,9A\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].field(Field::Name), Some("Amy"));
    }

    #[test]
    fn ragged_rows_fail_the_whole_file() {
        let csv = "name,class,attendance\nAmy,9A,80\nBen,9B\n";
        assert!(parse_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn whitespace_only_lines_are_skipped() {
        let csv = "name,class,attendance,score\nAmy,9A,90,90\n   \nBen,9B,80,80\n \t \r\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].field(Field::Name), Some("Ben"));
        assert_eq!(rows[1].line, 4);
    }

    #[test]
    fn short_row_after_blank_line_still_fails() {
        let err = parse_csv(b"name,class,attendance\nAmy,9A,80\n  \nBen,9B\n").unwrap_err();
        assert!(matches!(err, AppError::MalformedCsv(_)));
    }

    #[test]
    fn row_of_empty_cells_is_kept_for_validation() {
        let rows = parse_csv(b"name,class\n , \n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field(Field::Name), None);
    }

    #[test]
    fn empty_file_has_no_rows() {
        assert!(parse_csv(b"").unwrap().is_empty());
        assert!(parse_csv(b"name,class\n").unwrap().is_empty());
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let csv = "name,class\n\"Lee, Amy\",9A\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].field(Field::Name), Some("Lee, Amy"));
    }
}
