use std::path::{Path, PathBuf};

pub const HEADER: &str =
    "Roll_No,Name,Hours_Studied,Sleep_Hours,Attendance,Internet_Usage,Score,Result";

const USAGE: [&str; 3] = ["Low", "Medium", "High"];

/// Deterministic class roster where passing tracks study hours and score.
pub fn student_csv(rows: i64) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for roll_no in 1..=rows {
        let hours = (roll_no * 7 % 10) as f32;
        let usage = USAGE[(roll_no % 3) as usize];
        let usage_penalty = if usage == "High" { 6.0 } else { 0.0 };
        let score = 22.0 + hours * 8.0 - usage_penalty;
        let attendance = 55.0 + hours * 4.5;
        let sleep = 5.0 + (roll_no % 4) as f32;
        let result = if score >= 50.0 { "Pass" } else { "Fail" };
        text.push_str(&format!(
            "{roll_no},Student {roll_no},{hours},{sleep},{attendance},{usage},{score},{result}\n"
        ));
    }
    text
}

pub fn write_student_csv(dir: &Path, rows: i64) -> PathBuf {
    let path = dir.join("online_exam_performance_data.csv");
    std::fs::write(&path, student_csv(rows)).expect("write dataset");
    path
}
