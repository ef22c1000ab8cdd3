//! ITC-2007 curriculum-based course timetabling (`.ctt`) format.
//!
//! ```text
//! Name: ToyExample
//! Courses: 4
//! Rooms: 2
//! Days: 5
//! Periods_per_day: 4
//! Curricula: 2
//! Constraints: 8
//!
//! COURSES:
//! SceCosC Ocra 3 3 30
//! ...
//! ROOMS:
//! A 32
//! ...
//! CURRICULA:
//! Cur1 3 SceCosC ArcTec TecCos
//! ...
//! UNAVAILABILITY_CONSTRAINTS:
//! TecCos 2 0
//! ...
//! END.
//! ```
//!
//! Course lines are `id teacher lectures min_days students`, room lines
//! `id capacity`, curriculum lines `id count course...` and unavailability
//! lines `course day period`. Blank lines are ignored. Section sizes must
//! match the header counts.
//!
//! # Reference
//! Di Gaspero, McCollum, Schaerf (2007), "The Second International
//! Timetabling Competition (ITC-2007): Curriculum-based Course Timetabling
//! (Track 3)".

use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Result, TimetableError};
use crate::models::{Course, Curriculum, Room, TimetableProblem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Courses,
    Rooms,
    Curricula,
    Unavailability,
    End,
}

impl Section {
    fn from_marker(line: &str) -> Option<Self> {
        match line {
            "COURSES:" => Some(Self::Courses),
            "ROOMS:" => Some(Self::Rooms),
            "CURRICULA:" => Some(Self::Curricula),
            "UNAVAILABILITY_CONSTRAINTS:" => Some(Self::Unavailability),
            "END." => Some(Self::End),
            _ => None,
        }
    }
}

/// A header count and the line it was declared on.
type Declared = Option<(usize, usize)>;

#[derive(Debug, Default)]
struct Header {
    name: Option<String>,
    courses: Declared,
    rooms: Declared,
    days: Declared,
    periods_per_day: Declared,
    curricula: Declared,
    constraints: Declared,
}

impl Header {
    fn set(&mut self, line: usize, fields: &[&str]) -> Result<()> {
        let [key, value] = fields else {
            return Err(TimetableError::parse(line, "expected `Key: value`"));
        };
        let slot = match *key {
            "Name:" => {
                self.name = Some((*value).to_string());
                return Ok(());
            }
            "Courses:" => &mut self.courses,
            "Rooms:" => &mut self.rooms,
            "Days:" => &mut self.days,
            "Periods_per_day:" => &mut self.periods_per_day,
            "Curricula:" => &mut self.curricula,
            "Constraints:" => &mut self.constraints,
            other => {
                debug!("ignoring header field {other} at line {line}");
                return Ok(());
            }
        };
        *slot = Some((number(line, key, value)?, line));
        Ok(())
    }
}

fn number<T: std::str::FromStr>(line: usize, what: &str, field: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| TimetableError::parse(line, format!("{what} must be a non-negative integer, got `{field}`")))
}

fn required(declared: Declared, key: &str) -> Result<usize> {
    declared
        .map(|(n, _)| n)
        .ok_or_else(|| TimetableError::parse(0, format!("missing header field {key}")))
}

fn check_count(declared: Declared, what: &str, found: usize) -> Result<()> {
    match declared {
        Some((n, line)) if n != found => Err(TimetableError::parse(
            line,
            format!("header declares {n} {what} but {found} were listed"),
        )),
        _ => Ok(()),
    }
}

fn parse_course(line: usize, fields: &[&str]) -> Result<Course> {
    let [id, teacher, lectures, min_days, students] = fields else {
        return Err(TimetableError::parse(
            line,
            "course line must be `id teacher lectures min_days students`",
        ));
    };
    Ok(Course::new(*id)
        .with_teacher(*teacher)
        .with_meetings(number(line, "lectures", lectures)?, number(line, "min_days", min_days)?)
        .with_enrollment(number(line, "students", students)?))
}

fn parse_room(line: usize, fields: &[&str]) -> Result<Room> {
    let [id, capacity] = fields else {
        return Err(TimetableError::parse(line, "room line must be `id capacity`"));
    };
    Ok(Room::new(*id, number(line, "capacity", capacity)?))
}

fn parse_curriculum(line: usize, fields: &[&str]) -> Result<Curriculum> {
    let [id, count, members @ ..] = fields else {
        return Err(TimetableError::parse(line, "curriculum line must be `id count course...`"));
    };
    let count: usize = number(line, "course count", count)?;
    if count != members.len() {
        return Err(TimetableError::parse(
            line,
            format!("curriculum {id} declares {count} courses but lists {}", members.len()),
        ));
    }
    Ok(Curriculum::new(*id).with_courses(members.iter().copied()))
}

/// Parses a `.ctt` document.
///
/// # Errors
/// [`TimetableError::Parse`] on malformed lines, a missing `Days` or
/// `Periods_per_day` header, or section sizes that disagree with the header.
pub fn parse_ctt(input: &str) -> Result<TimetableProblem> {
    let mut section = Section::Header;
    let mut header = Header::default();
    let mut courses = Vec::new();
    let mut rooms = Vec::new();
    let mut curricula = Vec::new();
    let mut blocked = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(next) = Section::from_marker(text) {
            section = next;
            if section == Section::End {
                break;
            }
            continue;
        }

        let fields: Vec<&str> = text.split_whitespace().collect();
        match section {
            Section::Header => header.set(line, &fields)?,
            Section::Courses => courses.push(parse_course(line, &fields)?),
            Section::Rooms => rooms.push(parse_room(line, &fields)?),
            Section::Curricula => curricula.push(parse_curriculum(line, &fields)?),
            Section::Unavailability => {
                let [course, day, period] = fields.as_slice() else {
                    return Err(TimetableError::parse(line, "unavailability line must be `course day period`"));
                };
                let day: usize = number(line, "day", day)?;
                let period: usize = number(line, "period", period)?;
                blocked.push(((*course).to_string(), day, period));
            }
            Section::End => break,
        }
    }

    check_count(header.courses, "courses", courses.len())?;
    check_count(header.rooms, "rooms", rooms.len())?;
    check_count(header.curricula, "curricula", curricula.len())?;
    check_count(header.constraints, "constraints", blocked.len())?;

    let mut problem = TimetableProblem::new(
        header.name.unwrap_or_default(),
        required(header.days, "Days")?,
        required(header.periods_per_day, "Periods_per_day")?,
    );
    problem.courses = courses;
    problem.rooms = rooms;
    problem.curricula = curricula;
    for (course, day, period) in blocked {
        problem.add_unavailability(course, day, period);
    }

    info!(
        "parsed {}: {} courses, {} rooms, {}x{} grid, {} curricula",
        problem.name,
        problem.course_count(),
        problem.rooms.len(),
        problem.num_days,
        problem.periods_per_day,
        problem.curricula.len()
    );
    Ok(problem)
}

/// Reads and parses a `.ctt` file.
pub fn read_ctt(path: impl AsRef<Path>) -> Result<TimetableProblem> {
    let text = fs::read_to_string(path)?;
    parse_ctt(&text)
}

/// Writes a problem in `.ctt` format.
///
/// Unavailability is written grouped by course id. Courses with an empty
/// teacher are written with teacher `-`.
pub fn write_ctt<W: io::Write>(problem: &TimetableProblem, mut out: W) -> Result<()> {
    let constraints: usize = problem.unavailability.values().map(Vec::len).sum();

    writeln!(out, "Name: {}", problem.name)?;
    writeln!(out, "Courses: {}", problem.course_count())?;
    writeln!(out, "Rooms: {}", problem.rooms.len())?;
    writeln!(out, "Days: {}", problem.num_days)?;
    writeln!(out, "Periods_per_day: {}", problem.periods_per_day)?;
    writeln!(out, "Curricula: {}", problem.curricula.len())?;
    writeln!(out, "Constraints: {constraints}")?;

    writeln!(out, "\nCOURSES:")?;
    for c in &problem.courses {
        let teacher = if c.teacher_id.is_empty() { "-" } else { c.teacher_id.as_str() };
        writeln!(
            out,
            "{} {} {} {} {}",
            c.id, teacher, c.meetings_per_week, c.min_working_days, c.max_enrollment
        )?;
    }

    writeln!(out, "\nROOMS:")?;
    for r in &problem.rooms {
        writeln!(out, "{} {}", r.id, r.capacity)?;
    }

    writeln!(out, "\nCURRICULA:")?;
    for q in &problem.curricula {
        writeln!(out, "{} {} {}", q.id, q.courses.len(), q.courses.join(" "))?;
    }

    writeln!(out, "\nUNAVAILABILITY_CONSTRAINTS:")?;
    for (course, cells) in &problem.unavailability {
        for cell in cells {
            writeln!(out, "{course} {} {}", cell.day, cell.period)?;
        }
    }

    writeln!(out, "\nEND.")?;
    Ok(())
}
