use std::io::Read;

use csv::{ReaderBuilder, Trim};

use super::{Cell, IngestError, RawTable};

/// Read a headered CSV. Every non-empty field becomes [`Cell::Text`].
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| Cell::Text(field.to_string())))
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}
