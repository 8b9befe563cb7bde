//! Чтение и запись CSV

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Writer};

use crate::error::{PipelineError, Result};
use crate::types::Dataset;

pub struct DataLoader;

impl DataLoader {
    /// Загрузка CSV с заголовком. Отсутствующий файл - `MissingInput`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PipelineError::MissingInput {
                path: path.display().to_string(),
            },
            _ => PipelineError::Io(e),
        })?;

        let dataset = Self::read(file)?;
        tracing::debug!("Loaded {} rows from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn read<R: Read>(reader: R) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Dataset::new(headers, rows))
    }

    /// Запись CSV: заголовок и по строке на запись.
    /// Существующий файл перезаписывается без предупреждения.
    pub fn save<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        Self::write(dataset, file)
    }

    pub fn write<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(dataset.headers())?;
        for row in dataset.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CSV: &str = "price,area,bedrooms,furnishingstatus\n\
                       13300000,7420,4,furnished\n\
                       12250000,8960,4,\"semi, furnished\"\n";

    #[test]
    fn test_read_keeps_all_columns() {
        let ds = DataLoader::read(CSV.as_bytes()).unwrap();
        assert_eq!(ds.headers(), ["price", "area", "bedrooms", "furnishingstatus"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1][3], "semi, furnished");
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old,content\n1,2\n3,4\n5,6\n").unwrap();

        let ds = DataLoader::read(CSV.as_bytes()).unwrap();
        DataLoader::save(&ds, &path).unwrap();

        let loaded = DataLoader::load(&path).unwrap();
        assert_eq!(loaded, ds);
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        match DataLoader::load(dir.path().join("house_prices.csv")) {
            Err(PipelineError::MissingInput { path }) => assert!(path.ends_with("house_prices.csv")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = DataLoader::read("price,area\n1,2,3\n".as_bytes());
        assert!(matches!(result, Err(PipelineError::Csv(_))));
    }
}
