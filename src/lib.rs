//! Curriculum-based course timetabling as a constraint satisfaction problem.
//!
//! Assigns every course a room and a weekly time interval so that no room
//! is double-booked, rooms are large enough, blocked periods are avoided,
//! and courses sharing a curriculum never overlap. Solutions are checked
//! and scored by an independent verifier.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeInterval`, `Course`, `Room`,
//!   `Curriculum`, `TimetableProblem`, `Timetable`
//! - **`catalog`**: The weekly interval catalog and ITC grid mapping
//! - **`csp`**: Domains, constraints, the CSP model, backtracking and
//!   min-conflicts search
//! - **`verify`**: Solution verification and penalty scoring
//! - **`complexity`**: Random-assignment difficulty estimate
//! - **`itc`**: ITC-2007 `.ctt` reader and writer
//! - **`solver`**: End-to-end pipeline
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown courses)
//!
//! # Example
//!
//! ```
//! use u_timetable::csp::SearchConfig;
//! use u_timetable::models::{Course, Curriculum, Room, TimetableProblem};
//! use u_timetable::solver::TimetableSolver;
//!
//! let problem = TimetableProblem::new("demo", 5, 4)
//!     .with_course(Course::new("algebra").with_enrollment(40))
//!     .with_course(Course::new("physics").with_enrollment(35))
//!     .with_room(Room::new("hall", 60))
//!     .with_curriculum(Curriculum::new("year1").with_courses(["algebra", "physics"]));
//!
//! let report = TimetableSolver::new(SearchConfig::informed()).solve(&problem).unwrap();
//! let timetable = report.timetable.unwrap();
//! let algebra = timetable.get("algebra").unwrap();
//! let physics = timetable.get("physics").unwrap();
//! assert!(!algebra.interval.overlaps(&physics.interval));
//! ```
//!
//! # References
//!
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Di Gaspero, McCollum, Schaerf (2007), "The Second International
//!   Timetabling Competition (ITC-2007): Curriculum-based Course Timetabling"

pub mod catalog;
pub mod complexity;
pub mod csp;
pub mod error;
pub mod itc;
pub mod models;
pub mod solver;
pub mod validation;
pub mod verify;

pub use error::{Result, TimetableError};
