//! Randomized exercising of a [`Library`].
//!
//! The simulator adds, removes, and searches for books chosen by a seeded
//! random generator and reports each event as an [`EventReport`]. It only uses
//! the public [`Library`] API. The generator is owned by the [`Simulation`] and
//! passed explicitly to every event, so a fixed seed replays the same run.
//!
//! # Examples
//!
//! ```
//! use bibcat::simulation::{Simulation, SimulationConfig};
//!
//! # fn main() -> bibcat::Result<()> {
//! let config = SimulationConfig {
//!     steps: 10,
//!     seed: Some(42),
//!     ..SimulationConfig::default()
//! };
//! let first = Simulation::new(config.clone()).run()?;
//! let second = Simulation::new(config).run()?;
//! assert_eq!(first, second);
//! # Ok(())
//! # }
//! ```

use crate::book::{AsIsbn, Book, CatalogEntry, CoverType, FileFormat};
use crate::error::{CatalogError, Result};
use crate::library::Library;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::ops::RangeInclusive;

/// Titles drawn by the book generator
pub const TITLES: [&str; 5] = [
    "War and Peace",
    "Crime and Punishment",
    "And Quiet Flows the Don",
    "The Master and Margarita",
    "Eugene Onegin",
];

/// Authors drawn by the book generator and the author search
pub const AUTHORS: [&str; 5] = [
    "Leo Tolstoy",
    "Fyodor Dostoevsky",
    "Mikhail Sholokhov",
    "Mikhail Bulgakov",
    "Alexander Pushkin",
];

/// Genres drawn by the book generator and the genre search
pub const GENRES: [&str; 5] = ["novel", "history", "classic", "fantasy", "detective"];

const COVERS: [CoverType; 2] = [CoverType::Paperback, CoverType::Hardcover];
const FILE_FORMATS: [FileFormat; 3] = [FileFormat::Epub, FileFormat::Pdf, FileFormat::Mobi];

/// How many genre matches a genre search report lists
const GENRE_SAMPLE: usize = 3;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of events to run
    pub steps: usize,
    /// Seed for the generator; `None` seeds from the operating system
    pub seed: Option<u64>,
    /// Years generated books and year searches are drawn from
    pub year_range: RangeInclusive<i32>,
    /// Probability that a generated book is digital
    pub digital_ratio: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 20,
            seed: None,
            year_range: 1980..=2024,
            digital_ratio: 0.5,
        }
    }
}

impl SimulationConfig {
    /// Check that the year range is non-empty and the digital ratio is a
    /// probability.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.year_range.is_empty() {
            return Err(CatalogError::InvalidConfig(format!(
                "year_range {}..={} is empty",
                self.year_range.start(),
                self.year_range.end()
            )));
        }
        if !(0.0..=1.0).contains(&self.digital_ratio) {
            return Err(CatalogError::InvalidConfig(format!(
                "digital_ratio must be between 0 and 1, got {}",
                self.digital_ratio
            )));
        }
        Ok(())
    }

    /// Generate a printed or digital book with random attributes.
    ///
    /// # Panics
    ///
    /// Panics if `year_range` is empty or `digital_ratio` is NaN. Call
    /// [`validate`](Self::validate) first for configs built by hand.
    pub fn random_book<R: Rng + ?Sized>(&self, rng: &mut R) -> Book {
        let title = pick(&TITLES, rng);
        let author = pick(&AUTHORS, rng);
        let genre = pick(&GENRES, rng);
        let year = rng.random_range(self.year_range.clone());
        let builder = Book::builder(random_isbn(rng))
            .title(title)
            .author(author)
            .year(year)
            .genre(genre);

        if rng.random_bool(self.digital_ratio.clamp(0.0, 1.0)) {
            let file_format = pick(&FILE_FORMATS, rng);
            let file_size_mb = (rng.random_range(0.8..15.0_f64) * 100.0).round() / 100.0;
            builder.digital(file_format, file_size_mb).build()
        } else {
            let pages = rng.random_range(120..=720);
            let cover = pick(&COVERS, rng);
            builder.printed(pages, cover).build()
        }
    }
}

/// Generate a pseudo ISBN-13 string such as `482-9780306406157`.
pub fn random_isbn<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix: u16 = rng.random_range(100..=999);
    let body: u64 = rng.random_range(1_000_000_000_000..=9_999_999_999_999);
    format!("{prefix}-{body}")
}

/// Generate a book with the default configuration.
pub fn random_book<R: Rng + ?Sized>(rng: &mut R) -> Book {
    SimulationConfig::default().random_book(rng)
}

fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> T {
    // Only called with the non-empty constant tables above.
    *items.choose(rng).unwrap_or(&items[0])
}

/// The kinds of event a simulation step can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Catalogue a newly generated book
    AddBook,
    /// Remove a random book
    RemoveBook,
    /// Look up a random known author
    SearchAuthor,
    /// Look up a random year
    SearchYear,
    /// Scan for a random genre
    SearchGenre,
    /// Rebuild the indexes
    RefreshIndex,
    /// Look up an ISBN that should not exist
    MissingLookup,
}

impl Event {
    /// Every event, in the order steps choose from
    pub const ALL: [Event; 7] = [
        Event::AddBook,
        Event::RemoveBook,
        Event::SearchAuthor,
        Event::SearchYear,
        Event::SearchGenre,
        Event::RefreshIndex,
        Event::MissingLookup,
    ];
}

/// What a single event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventReport {
    /// A book was catalogued
    Added {
        /// `Title (Year)`
        label: String,
        /// Author
        author: String,
        /// ISBN
        isbn: String,
    },
    /// A book was removed
    Removed {
        /// `Title (Year)`
        label: String,
        /// ISBN
        isbn: String,
    },
    /// A removal was requested from an empty library
    LibraryEmpty,
    /// Result of an author search
    AuthorSearch {
        /// Author searched for
        author: String,
        /// Labels of the matching books
        labels: Vec<String>,
    },
    /// Result of a year search
    YearSearch {
        /// Year searched for
        year: i32,
        /// Number of matches
        count: usize,
    },
    /// Result of a genre scan
    GenreSearch {
        /// Genre searched for
        genre: String,
        /// Number of matches
        count: usize,
        /// Labels of the first few matches
        sample: Vec<String>,
    },
    /// The indexes were rebuilt
    Reindexed {
        /// Books indexed after the rebuild
        count: usize,
    },
    /// Result of looking up a generated ISBN
    Lookup {
        /// ISBN looked up
        isbn: String,
        /// Whether it unexpectedly existed
        found: bool,
    },
}

impl fmt::Display for EventReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added {
                label,
                author,
                isbn,
            } => write!(f, "[add] Stored {label} by {author} [{isbn}]"),
            Self::Removed { label, isbn } => write!(f, "[remove] Removed {label} [{isbn}]"),
            Self::LibraryEmpty => write!(f, "[remove] Library is empty, nothing to remove"),
            Self::AuthorSearch { author, labels } => {
                write!(f, "[author-search] {author}: {}", join_or_none(labels))
            },
            Self::YearSearch { year, count } => {
                write!(f, "[year-search] {year}: found {count} books")
            },
            Self::GenreSearch {
                genre,
                count,
                sample,
            } => write!(
                f,
                "[genre-search] {genre}: {count} books -> {}",
                join_or_none(sample)
            ),
            Self::Reindexed { count } => {
                write!(f, "[reindex] Rebuilt indexes for {count} books")
            },
            Self::Lookup { isbn, found: false } => write!(
                f,
                "[lookup] Book with ISBN {isbn} not found, handled without error"
            ),
            Self::Lookup { isbn, found: true } => {
                write!(f, "[lookup] Unexpectedly found book with ISBN {isbn}")
            },
        }
    }
}

fn join_or_none(labels: &[String]) -> String {
    if labels.is_empty() {
        "no matches".to_string()
    } else {
        labels.join(", ")
    }
}

/// Catalogue a generated book, drawing again until its ISBN is new.
///
/// # Errors
///
/// Propagates any error from [`Library::add_book`].
pub fn add_book_event<R: Rng + ?Sized>(
    library: &mut Library,
    rng: &mut R,
    config: &SimulationConfig,
) -> Result<EventReport> {
    let mut candidate = config.random_book(rng);
    while library.contains(&candidate) {
        candidate = config.random_book(rng);
    }
    let report = EventReport::Added {
        label: candidate.short_label(),
        author: candidate.author().to_string(),
        isbn: candidate.isbn().to_string(),
    };
    library.add_book(candidate)?;
    Ok(report)
}

/// Remove a random book; an empty library is reported, not an error.
///
/// # Errors
///
/// Propagates any error from [`Library::remove_random`] other than
/// [`CatalogError::EmptyCollection`].
pub fn remove_book_event<R: Rng + ?Sized>(
    library: &mut Library,
    rng: &mut R,
) -> Result<EventReport> {
    match library.remove_random(rng) {
        Ok(removed) => Ok(EventReport::Removed {
            label: removed.short_label(),
            isbn: removed.isbn().to_string(),
        }),
        Err(CatalogError::EmptyCollection) => {
            log::warn!("Library is empty, skipping removal");
            Ok(EventReport::LibraryEmpty)
        },
        Err(err) => Err(err),
    }
}

/// Search for a random known author.
pub fn search_author_event<R: Rng + ?Sized>(library: &Library, rng: &mut R) -> EventReport {
    let author = pick(&AUTHORS, rng);
    let labels = library
        .find_by_author(author)
        .iter()
        .map(|book| book.short_label())
        .collect();
    EventReport::AuthorSearch {
        author: author.to_string(),
        labels,
    }
}

/// Search for a random year in the configured range.
///
/// # Panics
///
/// Panics if `config.year_range` is empty.
pub fn search_year_event<R: Rng + ?Sized>(
    library: &Library,
    rng: &mut R,
    config: &SimulationConfig,
) -> EventReport {
    let year = rng.random_range(config.year_range.clone());
    EventReport::YearSearch {
        year,
        count: library.find_by_year(year).len(),
    }
}

/// Scan for a random genre and sample the first matches.
pub fn search_genre_event<R: Rng + ?Sized>(library: &Library, rng: &mut R) -> EventReport {
    let genre = pick(&GENRES, rng);
    let matches = library.find_by_genre(genre);
    let sample = matches
        .slice(..GENRE_SAMPLE)
        .iter()
        .map(|book| book.short_label())
        .collect();
    EventReport::GenreSearch {
        genre: genre.to_string(),
        count: matches.len(),
        sample,
    }
}

/// Rebuild the indexes.
pub fn refresh_index_event(library: &mut Library) -> EventReport {
    library.refresh_indexes();
    EventReport::Reindexed {
        count: library.index().len(),
    }
}

/// Look up a freshly generated ISBN, which is expected to be absent.
///
/// # Errors
///
/// Propagates lookup errors other than [`CatalogError::NotFound`].
pub fn missing_lookup_event<R: Rng + ?Sized>(library: &Library, rng: &mut R) -> Result<EventReport> {
    let isbn = random_isbn(rng);
    let found = match library.get_by_isbn(&isbn) {
        Ok(book) => {
            log::warn!("Generated ISBN {} already catalogued", book.as_isbn());
            true
        },
        Err(CatalogError::NotFound(_)) => false,
        Err(err) => return Err(err),
    };
    Ok(EventReport::Lookup { isbn, found })
}

/// A seeded run of random events against one library.
#[derive(Debug)]
pub struct Simulation {
    library: Library,
    rng: StdRng,
    config: SimulationConfig,
    steps_run: usize,
}

impl Simulation {
    /// Start a simulation on an empty library.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_library(Library::new(), config)
    }

    /// Start a simulation on an existing library.
    #[must_use]
    pub fn with_library(library: Library, config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            library,
            rng,
            config,
            steps_run: 0,
        }
    }

    /// The library being exercised
    #[must_use]
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Finish the simulation and take the library
    #[must_use]
    pub fn into_library(self) -> Library {
        self.library
    }

    /// Number of steps run so far
    #[must_use]
    pub fn steps_run(&self) -> usize {
        self.steps_run
    }

    /// Run one specific event.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidConfig`] if the config fails
    /// [`SimulationConfig::validate`], and propagates unrecoverable library
    /// errors.
    pub fn apply(&mut self, event: Event) -> Result<EventReport> {
        self.config.validate()?;
        let library = &mut self.library;
        let rng = &mut self.rng;
        match event {
            Event::AddBook => add_book_event(library, rng, &self.config),
            Event::RemoveBook => remove_book_event(library, rng),
            Event::SearchAuthor => Ok(search_author_event(library, rng)),
            Event::SearchYear => Ok(search_year_event(library, rng, &self.config)),
            Event::SearchGenre => Ok(search_genre_event(library, rng)),
            Event::RefreshIndex => Ok(refresh_index_event(library)),
            Event::MissingLookup => missing_lookup_event(library, rng),
        }
    }

    /// Run one uniformly chosen event.
    ///
    /// # Errors
    ///
    /// Propagates unrecoverable library errors.
    pub fn step(&mut self) -> Result<EventReport> {
        let event = Event::ALL[self.rng.random_range(0..Event::ALL.len())];
        let report = self.apply(event)?;
        self.steps_run += 1;
        log::info!("Step {}: {report}", self.steps_run);
        Ok(report)
    }

    /// Run the configured number of steps and collect their reports.
    ///
    /// # Errors
    ///
    /// Stops at the first unrecoverable library error.
    pub fn run(&mut self) -> Result<Vec<EventReport>> {
        (0..self.config.steps).map(|_| self.step()).collect()
    }
}
