use crate::allocator::{unallocated_mentees, unallocated_mentors, AllocationSummary};
use crate::models::{
    AllocationRow, Assignment, Mentee, Mentor, Rank, UnallocatedMenteeRow, UnallocatedMentorRow,
};
use anyhow::{Context, Result};
use csv::Writer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ALLOCATIONS_FILE: &str = "allocations.csv";
pub const UNALLOCATED_MENTEES_FILE: &str = "not_allocated_mentees.csv";
pub const UNALLOCATED_MENTORS_FILE: &str = "not_allocated_mentors.csv";

/// One row per assignment, in processing order. Capacity columns show the
/// state after the whole pass.
pub fn write_allocations<W: io::Write>(
    output: W,
    mentees: &[Mentee],
    mentors: &[Mentor],
    assignments: &[Assignment],
) -> Result<()> {
    let mut writer = Writer::from_writer(output);

    for assignment in assignments {
        let mentee = &mentees[assignment.mentee];
        let mentor = &mentors[assignment.mentor];
        writer.serialize(AllocationRow {
            mentee_name: &mentee.name,
            mentee_email: &mentee.email,
            mentor_name: &mentor.name,
            mentor_email: &mentor.email,
            country: &mentee.country,
            mentee_year: mentee.graduation_year,
            department: &mentee.department,
            mentor_capacity_left: mentor.capacity,
            mentor_total_capacity: mentor.total_capacity,
            rank: assignment.rank.to_string(),
        })?;
    }

    // serde only emits a header with the first row
    if assignments.is_empty() {
        writer.write_record([
            "mentee_name",
            "mentee_email",
            "mentor_name",
            "mentor_email",
            "country",
            "mentee_year",
            "department",
            "mentor_capacity_left",
            "mentor_total_capacity",
            "rank",
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_unallocated_mentees<W: io::Write>(output: W, mentees: &[&Mentee]) -> Result<()> {
    let mut writer = Writer::from_writer(output);

    for mentee in mentees {
        writer.serialize(UnallocatedMenteeRow {
            mentee_name: &mentee.name,
            mentee_email: &mentee.email,
            year: mentee.graduation_year,
        })?;
    }
    if mentees.is_empty() {
        writer.write_record(["mentee_name", "mentee_email", "year"])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_unallocated_mentors<W: io::Write>(output: W, mentors: &[&Mentor]) -> Result<()> {
    let mut writer = Writer::from_writer(output);

    for mentor in mentors {
        writer.serialize(UnallocatedMentorRow {
            mentor_name: &mentor.name,
            mentor_email: &mentor.email,
        })?;
    }
    if mentors.is_empty() {
        writer.write_record(["mentor_name", "mentor_email"])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the three result files into `output_dir`, creating it if needed.
pub fn write_all(
    output_dir: &str,
    mentees: &[Mentee],
    mentors: &[Mentor],
    assignments: &[Assignment],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    let dir = Path::new(output_dir);
    let allocations_path = dir.join(ALLOCATIONS_FILE);
    let mentees_path = dir.join(UNALLOCATED_MENTEES_FILE);
    let mentors_path = dir.join(UNALLOCATED_MENTORS_FILE);

    write_allocations(create(&allocations_path)?, mentees, mentors, assignments)
        .with_context(|| format!("Failed to write {}", allocations_path.display()))?;
    info!(path = %allocations_path.display(), rows = assignments.len(), "saved allocations");

    let left_mentees = unallocated_mentees(mentees, assignments);
    write_unallocated_mentees(create(&mentees_path)?, &left_mentees)
        .with_context(|| format!("Failed to write {}", mentees_path.display()))?;
    info!(path = %mentees_path.display(), rows = left_mentees.len(), "saved unallocated mentees");

    let left_mentors = unallocated_mentors(mentors, assignments);
    write_unallocated_mentors(create(&mentors_path)?, &left_mentors)
        .with_context(|| format!("Failed to write {}", mentors_path.display()))?;
    info!(path = %mentors_path.display(), rows = left_mentors.len(), "saved unallocated mentors");

    Ok(vec![allocations_path, mentees_path, mentors_path])
}

fn create(path: &Path) -> Result<fs::File> {
    fs::File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))
}

pub fn print_summary(summary: &AllocationSummary) {
    println!("\n📊 SUMMARY");
    println!("==========");
    println!("Mentors:   {}", summary.mentors);
    println!("Mentees:   {}", summary.mentees);
    println!("Allocated: {}", summary.allocated);
    println!("Unallocated mentees: {}", summary.mentees - summary.allocated);

    if !summary.by_rank.is_empty() {
        println!("\n🎯 Allocations by preference rank:");
        for (rank, count) in &summary.by_rank {
            match rank {
                Rank::Preferred(position) => println!("   choice {}: {}", position, count),
                Rank::Unranked => println!("   eligibility match: {}", count),
            }
        }
    }
}
