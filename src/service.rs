use crate::config::ConnectionConfig;
use crate::errors::{Result, StudentError};
use crate::models::{GradeLevelCount, NewStudent, Student, StudentChanges, StudentStatistics};
use crate::schema::students;
use chrono::NaiveDate;
use diesel::dsl::{avg, count_star, sql};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Date, Text};
use log::{debug, info};
use rust_decimal::Decimal;

/// Owns the single storage connection and runs every student operation
/// against it, one blocking statement at a time.
pub struct StudentRecordService {
    connection: PgConnection,
}

impl StudentRecordService {
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let connection = PgConnection::establish(&config.connection_string())?;
        info!("Connected to database {}", config);
        Ok(Self::from_connection(connection))
    }

    fn from_connection(connection: PgConnection) -> Self {
        StudentRecordService { connection }
    }

    /// Inserts a new record and returns the id assigned by storage.
    pub fn create(&mut self, student: NewStudent) -> Result<i32> {
        let connection = &mut self.connection;
        let values = student.to_values(|text| cast_date(connection, text))?;
        debug!("Inserting student {:?}", values);
        let student_id = diesel::insert_into(students::table)
            .values(&values)
            .returning(students::student_id)
            .get_result::<i32>(&mut self.connection)?;
        info!(
            "Student '{} {}' added with ID {}",
            values.first_name, values.last_name, student_id
        );
        Ok(student_id)
    }

    pub fn list_all(&mut self) -> Result<Vec<Student>> {
        debug!("Listing all students");
        let all = students::table
            .select(Student::as_select())
            .order_by((students::last_name.asc(), students::first_name.asc()))
            .load(&mut self.connection)?;
        Ok(all)
    }

    pub fn find_by_id(&mut self, student_id: i32) -> Result<Option<Student>> {
        debug!("Looking up student {}", student_id);
        let found = students::table
            .find(student_id)
            .select(Student::as_select())
            .first(&mut self.connection)
            .optional()?;
        Ok(found)
    }

    /// Case-insensitive substring match on first or last name.
    pub fn find_by_name(&mut self, text: &str) -> Result<Vec<Student>> {
        debug!("Searching students by name {:?}", text);
        let pattern = contains_pattern(text);
        let found = students::table
            .filter(
                students::first_name
                    .ilike(&pattern)
                    .or(students::last_name.ilike(&pattern)),
            )
            .select(Student::as_select())
            .order_by(students::student_id)
            .load(&mut self.connection)?;
        Ok(found)
    }

    /// Case-insensitive substring match on email.
    pub fn find_by_email(&mut self, text: &str) -> Result<Vec<Student>> {
        debug!("Searching students by email {:?}", text);
        let found = students::table
            .filter(students::email.ilike(contains_pattern(text)))
            .select(Student::as_select())
            .order_by(students::student_id)
            .load(&mut self.connection)?;
        Ok(found)
    }

    /// Merges `changes` onto the stored record and writes the result back.
    pub fn update(&mut self, student_id: i32, changes: StudentChanges) -> Result<Student> {
        let existing = self
            .find_by_id(student_id)?
            .ok_or(StudentError::NotFound(student_id))?;
        let connection = &mut self.connection;
        let values = changes.apply_to(&existing, |text| cast_date(connection, text))?;
        debug!("Updating student {} with {:?}", student_id, values);
        let updated = diesel::update(students::table.find(student_id))
            .set(&values)
            .returning(Student::as_returning())
            .get_result(&mut self.connection)
            .optional()?
            .ok_or(StudentError::NotFound(student_id))?;
        info!("Student ID {} updated", student_id);
        Ok(updated)
    }

    /// Removes the record permanently.
    pub fn delete(&mut self, student_id: i32) -> Result<()> {
        let deleted =
            diesel::delete(students::table.find(student_id)).execute(&mut self.connection)?;
        if deleted == 0 {
            return Err(StudentError::NotFound(student_id));
        }
        info!("Student ID {} deleted", student_id);
        Ok(())
    }

    pub fn statistics(&mut self) -> Result<StudentStatistics> {
        debug!("Computing student statistics");
        let total = students::table
            .select(count_star())
            .get_result::<i64>(&mut self.connection)?;
        let average_gpa = students::table
            .filter(students::gpa.is_not_null())
            .select(avg(students::gpa))
            .get_result::<Option<Decimal>>(&mut self.connection)?;
        let by_grade_level = students::table
            .filter(students::grade_level.is_not_null())
            .group_by(students::grade_level)
            .select((students::grade_level, count_star()))
            .order_by(students::grade_level)
            .load::<(Option<String>, i64)>(&mut self.connection)?
            .into_iter()
            .filter_map(|(grade_level, count)| {
                grade_level.map(|grade_level| GradeLevelCount { grade_level, count })
            })
            .collect();
        Ok(StudentStatistics {
            total,
            average_gpa,
            by_grade_level,
        })
    }

    pub fn close(self) {
        drop(self.connection);
        info!("Database connection closed");
    }
}

/// Lets storage interpret date text with its own `CAST(... AS DATE)`, so the
/// stored value is exactly what the database reads from the input. Text it
/// rejects comes back as a storage error.
fn cast_date(connection: &mut PgConnection, text: &str) -> Result<NaiveDate> {
    let date = diesel::select(sql::<Date>("CAST(").bind::<Text, _>(text).sql(" AS DATE)"))
        .get_result::<NaiveDate>(connection)?;
    Ok(date)
}

/// Builds an `ILIKE` pattern matching `text` anywhere, with wildcard
/// characters in `text` taken literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
