//! The record source: loads the full, unfiltered list of cast members from a
//! tabular data file. The view-state engine never sees this module, it only
//! gets the resulting `Vec<Person>` (or the failure) through the model.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{CastError, Person};

#[derive(Debug)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
pub struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

const COL_NAME: &str = "name";
const COL_SHOW: &str = "show";
const COL_ACTOR: &str = "actor";
const COL_DOB: &str = "date_of_birth";
const COL_MOVIES: &str = "movies";

const REQUIRED_COLUMNS: [&str; 5] = [COL_NAME, COL_SHOW, COL_ACTOR, COL_DOB, COL_MOVIES];

/// Load cast records from a CSV, Parquet or Arrow file.
pub fn load_people(path: PathBuf) -> Result<Vec<Person>, CastError> {
    let file_info = get_file_info(path)?;
    info!(
        "Loading {:?} ({} bytes, {:?}) ...",
        file_info.path, file_info.file_size, file_info.file_type
    );
    let frame = match file_info.file_type {
        FileType::CSV => load_csv(&file_info.path)?,
        FileType::PARQUET => load_parquet(&file_info.path)?,
        FileType::ARROW => load_arrow(&file_info.path)?,
    };

    let start_time = Instant::now();
    let df = frame.collect()?;

    // Materialize the required columns in parallel, one thread per column.
    // Every cell ends up as a String, matching what the engine and the UI
    // work with.
    let columns: Result<Vec<Vec<String>>, CastError> = REQUIRED_COLUMNS
        .par_iter()
        .map(|name| extract_column(&df, name))
        .collect();
    let columns = columns?;

    let mut people = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        people.push(Person {
            name: columns[0][row].clone(),
            show: columns[1][row].clone(),
            actor: columns[2][row].clone(),
            date_of_birth: columns[3][row].clone(),
            movie_titles: split_movie_titles(&columns[4][row]),
        });
    }

    let data_loading_duration = start_time.elapsed().as_millis();
    info!(
        "Loaded {} cast records in {data_loading_duration}ms",
        people.len()
    );
    debug!("First record: {:?}", people.first());

    Ok(people)
}

fn extract_column(df: &DataFrame, col_name: &str) -> Result<Vec<String>, CastError> {
    let col = df
        .column(col_name)
        .map_err(|_| CastError::MissingColumn(col_name.to_string()))?
        .cast(&DataType::String)?;
    let series = col.str()?;

    let mut data = Vec::with_capacity(series.len());
    for value in series.into_iter() {
        let ss = match value {
            Some(s) => s.replace("\r\n", " ").replace('\n', " ").trim().to_string(),
            None => String::new(),
        };
        data.push(ss);
    }
    Ok(data)
}

/// The movies cell holds a semicolon separated title list. The titles stay a
/// sequence from here on; only the presentation layer joins them.
fn split_movie_titles(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, CastError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CastError::FileNotFound,
        ErrorKind::PermissionDenied => CastError::PermissionDenied,
        _ => CastError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(CastError::LoadingFailed("Not a file!".into()));
    }

    let file_size = metadata.len();
    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size,
        file_type,
    })
}

fn detect_file_type(path: &Path) -> Result<FileType, CastError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(CastError::UnknownFileType),
    }
}

fn load_csv(path: &PathBuf) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.as_path().into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &PathBuf) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(
        PlPath::Local(path.as_path().into()),
        ScanArgsParquet::default(),
    )
}

fn load_arrow(path: &PathBuf) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.as_path().into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn loads_the_people_fixture() {
        let people = load_people(fixture("people.csv")).unwrap();
        assert_eq!(people.len(), 23);

        let jane = people.iter().find(|p| p.name == "Jane Margolis").unwrap();
        assert_eq!(jane.show, "Breaking Bad");
        assert_eq!(jane.actor, "Krysten Rit");
        assert_eq!(jane.date_of_birth, "1984-12-16");
        assert_eq!(jane.movie_titles, vec!["Paint the Sky", "Apartment 2B"]);
    }

    #[test]
    fn empty_movies_cell_loads_as_no_titles() {
        let people = load_people(fixture("people.csv")).unwrap();
        let nacho = people.iter().find(|p| p.name == "Nacho Varga").unwrap();
        assert!(nacho.movie_titles.is_empty());
    }

    #[test]
    fn missing_required_column_is_reported() {
        match load_people(fixture("people_no_movies.csv")) {
            Err(CastError::MissingColumn(column)) => assert_eq!(column, "movies"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            load_people(fixture("no_such_people.csv")),
            Err(CastError::FileNotFound)
        ));
    }

    #[test]
    fn movie_titles_split_on_semicolons_and_trim() {
        assert_eq!(
            split_movie_titles("El Camino; Road to Halloween ;The Heist"),
            vec!["El Camino", "Road to Halloween", "The Heist"]
        );
    }

    #[test]
    fn empty_movies_cell_yields_no_titles() {
        assert!(split_movie_titles("").is_empty());
        assert!(split_movie_titles(" ; ").is_empty());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            detect_file_type(Path::new("people.xlsx")),
            Err(CastError::UnknownFileType)
        ));
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(matches!(
            detect_file_type(Path::new("people.CsV")),
            Ok(FileType::CSV)
        ));
    }
}
