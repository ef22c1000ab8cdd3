//! Timetabling domain models.
//!
//! Provides the data types for describing a curriculum-based course
//! timetabling instance and its solutions.
//!
//! # Domain Mappings
//!
//! | u-timetable | CSP | ITC-2007 |
//! |-------------|-----|----------|
//! | Course | Variable | COURSES entry |
//! | Room × TimeInterval | Value | ROOMS × (day, period) |
//! | Curriculum | Pairwise constraint group | CURRICULA entry |
//! | Timetable | Assignment | Solution file |

mod course;
mod curriculum;
mod interval;
mod problem;
mod room;
mod timetable;

pub use course::Course;
pub use curriculum::{Curriculum, Unavailability};
pub use interval::{TimeInterval, Weekday};
pub use problem::TimetableProblem;
pub use room::Room;
pub use timetable::{Placement, Timetable};
