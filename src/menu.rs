//! Interactive numbered menu over a [`StudentRecordService`].
//!
//! Every operation prompts for its fields one line at a time, calls the
//! service, and prints the outcome. Errors from the service are reported and
//! the menu carries on; only line-editor errors (interrupt, EOF) end the loop.

use crate::errors::StudentError;
use crate::models::{NewStudent, Student, StudentChanges, StudentStatistics};
use crate::service::StudentRecordService;
use comfy_table::{Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use rustyline::DefaultEditor;

pub const APP_NAME: &str = "Student Management System";

/// Where the menu reads its answers from.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> rustyline::Result<String>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> rustyline::Result<String> {
        self.readline(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    List,
    Search,
    Update,
    Delete,
    Statistics,
    Exit,
}

impl MenuChoice {
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim() {
            "1" => Some(MenuChoice::Add),
            "2" => Some(MenuChoice::List),
            "3" => Some(MenuChoice::Search),
            "4" => Some(MenuChoice::Update),
            "5" => Some(MenuChoice::Delete),
            "6" => Some(MenuChoice::Statistics),
            "7" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Runs the menu until the user picks Exit. Interrupt and EOF come back as
/// `Err` so the caller can shut down.
pub fn run<L: LineSource>(
    service: &mut StudentRecordService,
    input: &mut L,
) -> rustyline::Result<()> {
    loop {
        println!("{}", render_menu());
        let answer = input.read_line("\nEnter your choice (1-7): ")?;
        match MenuChoice::parse(&answer) {
            Some(MenuChoice::Exit) => {
                println!("\nThank you for using {}!", APP_NAME);
                return Ok(());
            }
            Some(MenuChoice::Add) => add_student(service, input)?,
            Some(MenuChoice::List) => view_all_students(service),
            Some(MenuChoice::Search) => search_students(service, input)?,
            Some(MenuChoice::Update) => update_student(service, input)?,
            Some(MenuChoice::Delete) => delete_student(service, input)?,
            Some(MenuChoice::Statistics) => show_statistics(service),
            None => println!("\n✗ Invalid choice! Please enter a number between 1 and 7."),
        }
        input.read_line("\nPress Enter to continue...")?;
    }
}

fn add_student<L: LineSource>(
    service: &mut StudentRecordService,
    input: &mut L,
) -> rustyline::Result<()> {
    println!("{}", banner("ADD NEW STUDENT"));
    let student = prompt_new_student(input)?;
    let name = format!("{} {}", student.first_name, student.last_name);
    match service.create(student) {
        Ok(student_id) => {
            println!("\n✓ Student '{}' added successfully!", name);
            println!("  Student ID: {}", student_id);
        }
        Err(err) => report(&err),
    }
    Ok(())
}

fn view_all_students(service: &mut StudentRecordService) {
    println!("{}", banner("ALL STUDENTS"));
    match service.list_all() {
        Ok(all) if all.is_empty() => println!("\nNo students found in the database."),
        Ok(all) => {
            println!("\nTotal Students: {}\n", all.len());
            println!("{}", render_table(&all));
        }
        Err(err) => report(&err),
    }
}

fn search_students<L: LineSource>(
    service: &mut StudentRecordService,
    input: &mut L,
) -> rustyline::Result<()> {
    println!("{}", banner("SEARCH STUDENT"));
    println!("\n1. Search by Student ID");
    println!("2. Search by Name");
    println!("3. Search by Email");

    let result = match input.read_line("\nEnter choice (1-3): ")?.trim() {
        "1" => match prompt_student_id(input, "Enter Student ID: ")? {
            Some(student_id) => service
                .find_by_id(student_id)
                .map(|found| found.into_iter().collect::<Vec<_>>()),
            None => return Ok(()),
        },
        "2" => {
            let name = input.read_line("Enter name (first or last): ")?;
            service.find_by_name(name.trim())
        }
        "3" => {
            let email = input.read_line("Enter email: ")?;
            service.find_by_email(email.trim())
        }
        _ => {
            println!("\n✗ Invalid choice!");
            return Ok(());
        }
    };

    match result {
        Ok(found) if found.is_empty() => {
            println!("\n✗ No students found matching the search criteria.")
        }
        Ok(found) => {
            println!("\n✓ Found {} student(s):\n", found.len());
            for student in &found {
                println!("{}", render_details(student));
                println!("{}", "-".repeat(50));
            }
        }
        Err(err) => report(&err),
    }
    Ok(())
}

fn update_student<L: LineSource>(
    service: &mut StudentRecordService,
    input: &mut L,
) -> rustyline::Result<()> {
    println!("{}", banner("UPDATE STUDENT"));
    let Some(student_id) = prompt_student_id(input, "\nEnter Student ID to update: ")? else {
        return Ok(());
    };
    let existing = match service.find_by_id(student_id) {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            report(&StudentError::NotFound(student_id));
            return Ok(());
        }
        Err(err) => {
            report(&err);
            return Ok(());
        }
    };

    println!("\nCurrent Student Details:");
    println!("{}", render_details(&existing));
    println!("\nEnter new values (press Enter to keep current value):");
    let changes = prompt_changes(input, &existing)?;

    match service.update(student_id, changes) {
        Ok(_) => println!("\n✓ Student ID {} updated successfully!", student_id),
        Err(err) => report(&err),
    }
    Ok(())
}

fn delete_student<L: LineSource>(
    service: &mut StudentRecordService,
    input: &mut L,
) -> rustyline::Result<()> {
    println!("{}", banner("DELETE STUDENT"));
    let Some(student_id) = prompt_student_id(input, "\nEnter Student ID to delete: ")? else {
        return Ok(());
    };
    let existing = match service.find_by_id(student_id) {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            report(&StudentError::NotFound(student_id));
            return Ok(());
        }
        Err(err) => {
            report(&err);
            return Ok(());
        }
    };

    println!("\nStudent to be deleted:");
    println!("{}", render_details(&existing));
    let answer =
        input.read_line("\n⚠ Are you sure you want to delete this student? (yes/no): ")?;
    if !is_confirmed(&answer) {
        println!("\n✗ Deletion cancelled.");
        return Ok(());
    }

    match service.delete(student_id) {
        Ok(()) => println!("\n✓ Student ID {} deleted successfully!", student_id),
        Err(err) => report(&err),
    }
    Ok(())
}

fn show_statistics(service: &mut StudentRecordService) {
    println!("{}", banner("STUDENT STATISTICS"));
    match service.statistics() {
        Ok(stats) => println!("{}", render_statistics(&stats)),
        Err(err) => report(&err),
    }
}

pub fn prompt_new_student<L: LineSource>(input: &mut L) -> rustyline::Result<NewStudent> {
    Ok(NewStudent {
        first_name: input.read_line("First Name: ")?.trim().to_string(),
        last_name: input.read_line("Last Name: ")?.trim().to_string(),
        email: input.read_line("Email: ")?.trim().to_string(),
        phone: optional(input, "Phone (optional): ")?,
        date_of_birth: optional(input, "Date of Birth (YYYY-MM-DD): ")?,
        grade_level: optional(input, "Grade Level (e.g., 9th Grade): ")?,
        gpa: optional(input, "GPA (0.00-4.00, optional): ")?,
        address: optional(input, "Address (optional): ")?,
    })
}

/// Asks for every field with its current value in brackets. An empty
/// answer keeps the current value.
pub fn prompt_changes<L: LineSource>(
    input: &mut L,
    current: &Student,
) -> rustyline::Result<StudentChanges> {
    let dob = current.date_of_birth.map(|d| d.to_string());
    Ok(StudentChanges {
        first_name: optional(input, &format!("First Name [{}]: ", current.first_name))?,
        last_name: optional(input, &format!("Last Name [{}]: ", current.last_name))?,
        email: optional(input, &format!("Email [{}]: ", current.email))?,
        phone: optional(input, &format!("Phone [{}]: ", or_na(&current.phone)))?,
        date_of_birth: optional(input, &format!("Date of Birth [{}]: ", or_na(&dob)))?,
        grade_level: optional(
            input,
            &format!("Grade Level [{}]: ", or_na(&current.grade_level)),
        )?,
        gpa: optional(input, &format!("GPA [{}]: ", format_gpa(current.gpa)))?,
        address: optional(input, &format!("Address [{}]: ", or_na(&current.address)))?,
    })
}

fn optional<L: LineSource>(input: &mut L, prompt: &str) -> rustyline::Result<Option<String>> {
    let answer = input.read_line(prompt)?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

/// `None` when the answer is not a number; the message is printed here.
fn prompt_student_id<L: LineSource>(
    input: &mut L,
    prompt: &str,
) -> rustyline::Result<Option<i32>> {
    let answer = input.read_line(prompt)?;
    match answer.trim().parse::<i32>() {
        Ok(student_id) => Ok(Some(student_id)),
        Err(_) => {
            println!("\n✗ No student found with ID: {}", answer.trim());
            Ok(None)
        }
    }
}

fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

fn report(err: &StudentError) {
    match err {
        StudentError::DuplicateKey { .. } => {
            println!("\n✗ Error: Email already exists in the database.")
        }
        StudentError::InvalidInput { field, .. } => {
            println!("\n✗ Error: Invalid {} value. Please enter a valid value.", field)
        }
        StudentError::NotFound(student_id) => {
            println!("\n✗ No student found with ID: {}", student_id)
        }
        other => println!("\n✗ {}", other),
    }
}

fn banner(title: &str) -> String {
    let rule = "=".repeat(50);
    format!("\n{}\n{}\n{}", rule, title, rule)
}

pub fn render_menu() -> String {
    let rule = "=".repeat(50);
    format!(
        "\n{rule}\n{} v{}\n{rule}\n\n1. Add New Student\n2. View All Students\n\
         3. Search Student\n4. Update Student\n5. Delete Student\n6. View Statistics\n\
         7. Exit\n\n{rule}",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
    )
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

pub fn format_gpa(gpa: Option<Decimal>) -> String {
    match gpa {
        Some(mut gpa) => {
            gpa.rescale(2);
            gpa.to_string()
        }
        None => "N/A".to_string(),
    }
}

pub fn render_details(student: &Student) -> String {
    let dob = student.date_of_birth.map(|d| d.to_string());
    [
        format!("Student ID: {}", student.student_id),
        format!("Name: {} {}", student.first_name, student.last_name),
        format!("Email: {}", student.email),
        format!("Phone: {}", or_na(&student.phone)),
        format!("Date of Birth: {}", or_na(&dob)),
        format!("Grade Level: {}", or_na(&student.grade_level)),
        format!("GPA: {}", format_gpa(student.gpa)),
        format!("Address: {}", or_na(&student.address)),
        format!(
            "Enrollment Date: {}",
            student.enrollment_date.format("%Y-%m-%d %H:%M:%S")
        ),
    ]
    .join("\n")
}

pub fn render_table(students: &[Student]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Email", "Phone", "Grade Level", "GPA"]);
    for student in students {
        table.add_row(vec![
            student.student_id.to_string(),
            format!("{} {}", student.first_name, student.last_name),
            student.email.clone(),
            or_na(&student.phone).to_string(),
            or_na(&student.grade_level).to_string(),
            format_gpa(student.gpa),
        ]);
    }
    table.to_string()
}

pub fn render_statistics(stats: &StudentStatistics) -> String {
    let mut lines = vec![
        format!("\nTotal Students: {}", stats.total),
        format!("Average GPA: {}", format_gpa(stats.average_gpa)),
    ];
    if !stats.by_grade_level.is_empty() {
        lines.push("\nStudents by Grade Level:".to_string());
        for bucket in &stats.by_grade_level {
            lines.push(format!(
                "  {}: {} student(s)",
                bucket.grade_level, bucket.count
            ));
        }
    }
    lines.join("\n")
}
