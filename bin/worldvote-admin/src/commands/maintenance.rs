//! Counter repair and student removal.

use std::path::Path;

/// Recompute like counters from the vote rows — one participant, or all.
pub fn recount(db_path: &Path, id: Option<i64>) -> anyhow::Result<()> {
    let coordinator = super::open(db_path)?;

    match id {
        Some(id) => {
            let count = coordinator.recount(id)?;
            println!("participant {id}: like_count = {count}");
        }
        None => {
            let corrected = coordinator.recount_all()?;
            for (id, count) in &corrected {
                println!("participant {id}: like_count = {count}");
            }
            println!("Recounted {} participants.", corrected.len());
        }
    }
    Ok(())
}

/// Delete a student; their votes cascade away and the affected
/// participants are recounted in the same transaction.
pub fn remove_student(db_path: &Path, id: i64) -> anyhow::Result<()> {
    let coordinator = super::open(db_path)?;
    let corrected = coordinator.remove_student(id)?;
    println!("Removed student {id}; corrected {corrected} participant counters.");
    Ok(())
}
