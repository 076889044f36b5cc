use std::fs::File;
use std::io::Write;
use crate::schedule::{AnalysisResult, CommonSlot, Day, HOURS};

/// Formats the participants of a common slot, e.g. "2 students available: A, B"
pub fn format_students(slot: &CommonSlot) -> String {
    let count = slot.students.len();
    format!(
        "{} student{} available: {}",
        count,
        if count == 1 { "" } else { "s" },
        slot.students.join(", ")
    )
}

/// Renders an analysis as plain text, one section per day
pub fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("** Timetable analysis ({}) **\n", result.last_updated.to_rfc3339()));

    for day in Day::ALL {
        out.push_str(&format!("\n{} common free slots:\n", day));
        let slots = result.slots_for_day(day);
        if slots.is_empty() {
            out.push_str("  [NONE]\n");
            continue;
        }
        for slot in slots {
            let time = HOURS.get(slot.hour).copied().unwrap_or("?");
            out.push_str(&format!("  {} -> {}\n", time, format_students(slot)));
        }
    }

    out.push_str("\nSummary:\n");
    out.push_str(&result.ai_summary);
    out.push('\n');
    out
}

/// Writes the rendered analysis to `filename`
pub fn write_analysis_to_file(result: &AnalysisResult, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    file.write_all(render_analysis(result).as_bytes())?;
    Ok(())
}

/// Prints the analysis in a readable format
pub fn print_analysis(result: &AnalysisResult, student_count: usize) {
    println!("\n=== Common Free Slots ===");
    println!("Students analysed: {}", student_count);
    println!("Common slots found: {}", result.common_slots.len());
    print!("{}", render_analysis(result));
}
