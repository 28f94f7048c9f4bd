use std::io::Error;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

/// One cast member: biographical data plus the movies they appeared in.
/// Records are immutable once loaded; the movie titles stay an ordered
/// sequence until the presentation layer joins them for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub show: String,
    pub actor: String,
    pub date_of_birth: String,
    pub movie_titles: Vec<String>,
}

#[derive(Debug, Clone, Setters)]
pub struct Config {
    pub event_poll_time: u64,
    pub max_column_width: usize,
    /// Selectable page sizes. The engine only ever sees these values,
    /// it does not hard-code them.
    pub page_sizes: Vec<usize>,
    pub default_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            event_poll_time: 100,
            max_column_width: 40,
            page_sizes: vec![10, 15, 20, 25, 50, 100],
            default_page_size: 10,
        }
    }
}

#[derive(Debug)]
pub enum CastError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    MissingColumn(String),
    InvalidPageSize(usize),
}

impl From<Error> for CastError {
    fn from(err: Error) -> Self {
        CastError::IoError(err)
    }
}

impl From<PolarsError> for CastError {
    fn from(err: PolarsError) -> Self {
        CastError::PolarsError(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Quit,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    ToggleSort,
    SortAscending,
    SortDescending,
    CyclePageSize,
    Search,
    Reset,
    CopyPage,
    Help,
    Exit,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "cast - browse show cast records

  /          search by name (type to filter, Enter keeps, Esc clears)
  s          toggle name sort order
  a, d       sort names ascending / descending
  n, Right   next page
  p, Left    previous page
  g, Home    first page
  G, End     last page
  z          cycle page size
  r          reset search, sort and paging
  c          copy visible page to clipboard as csv
  ?          show this help
  Esc        close popup
  q          quit
";
