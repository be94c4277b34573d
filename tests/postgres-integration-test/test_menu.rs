use crate::postgres_test_util::with_student_service;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use studentdb::menu;
use studentdb::models::NewStudent;
use studentdb::service::StudentRecordService;
use studentdb::test_utils::ScriptedInput;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    studentdb::test_utils::init_logging_for_tests();
}

fn add_ada(service: &mut StudentRecordService) -> i32 {
    let ada = NewStudent {
        phone: Some("555-0100".to_string()),
        date_of_birth: Some("1815-12-10".to_string()),
        grade_level: Some("12th Grade".to_string()),
        address: Some("London".to_string()),
        ..NewStudent::new("Ada", "Lovelace", "ada@x.com").with_gpa("4.00")
    };
    service.create(ada).expect("Error saving new student")
}

#[test]
fn exit_choice_returns_ok() {
    with_student_service(|service| {
        let mut input = ScriptedInput::new(&["7"]);
        assert!(menu::run(service, &mut input).is_ok());
        assert_eq!(input.prompts, vec!["\nEnter your choice (1-7): "]);
    });
}

#[test]
fn running_out_of_answers_ends_with_eof() {
    with_student_service(|service| {
        let mut input = ScriptedInput::new(&["9", ""]);
        assert!(matches!(
            menu::run(service, &mut input),
            Err(ReadlineError::Eof)
        ));
        assert_eq!(input.prompts.len(), 3);
    });
}

#[test]
fn delete_needs_literal_yes() {
    with_student_service(|service| {
        let ada_id = add_ada(service);
        let id = ada_id.to_string();

        for refusal in ["no", "y", ""] {
            let mut input = ScriptedInput::new(&["5", id.as_str(), refusal, "", "7"]);
            menu::run(service, &mut input).unwrap();
            assert_eq!(input.remaining(), 0);
            assert!(service.find_by_id(ada_id).unwrap().is_some());
        }

        let mut input = ScriptedInput::new(&["5", id.as_str(), "yes", "", "7"]);
        menu::run(service, &mut input).unwrap();
        assert!(
            input
                .prompts
                .iter()
                .any(|p| p.contains("Are you sure you want to delete"))
        );
        assert!(service.find_by_id(ada_id).unwrap().is_none());
        assert!(service.list_all().unwrap().is_empty());

        // The id is gone, so no confirmation is asked the second time.
        let mut input = ScriptedInput::new(&["5", id.as_str(), "", "7"]);
        menu::run(service, &mut input).unwrap();
        assert!(
            !input
                .prompts
                .iter()
                .any(|p| p.contains("Are you sure you want to delete"))
        );
    });
}

#[test]
fn blank_update_answers_keep_stored_values() {
    with_student_service(|service| {
        let ada_id = add_ada(service);
        let id = ada_id.to_string();
        let before = service.find_by_id(ada_id).unwrap().unwrap();

        // Eight field prompts, then "Press Enter to continue".
        let blanks = [""; 9];
        let mut answers = vec!["4", id.as_str()];
        answers.extend(blanks);
        answers.push("7");
        let mut input = ScriptedInput::new(&answers);
        menu::run(service, &mut input).unwrap();
        assert_eq!(input.remaining(), 0);
        assert_eq!(service.find_by_id(ada_id).unwrap().unwrap(), before);

        let mut input =
            ScriptedInput::new(&["4", id.as_str(), "", "King", "", "", "", "", "3.95", "", "", "7"]);
        menu::run(service, &mut input).unwrap();
        let after = service.find_by_id(ada_id).unwrap().unwrap();
        assert_eq!(after.last_name, "King");
        assert_eq!(after.gpa, Some(Decimal::new(395, 2)));
        assert_eq!(after.first_name, before.first_name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.phone, before.phone);
        assert_eq!(after.date_of_birth, before.date_of_birth);
        assert_eq!(after.address, before.address);
        assert_eq!(after.enrollment_date, before.enrollment_date);
    });
}

#[test]
fn add_through_menu_and_recover_from_bad_gpa() {
    with_student_service(|service| {
        let mut input = ScriptedInput::new(&[
            "1", "Alan", "Turing", "alan@bletchley.uk", "", "1912-06-23", "", "four", "", "",
            "1", "Alan", "Turing", "alan@bletchley.uk", "", "1912-06-23", "", "3.70", "", "",
            "7",
        ]);
        menu::run(service, &mut input).unwrap();
        assert_eq!(input.remaining(), 0);

        let all = service.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].email, "alan@bletchley.uk");
        assert_eq!(all[0].date_of_birth, NaiveDate::from_ymd_opt(1912, 6, 23));
        assert_eq!(all[0].gpa, Some(Decimal::new(370, 2)));
        assert_eq!(all[0].phone, None);
    });
}

#[test]
fn unknown_or_non_numeric_id_returns_to_menu() {
    with_student_service(|service| {
        add_ada(service);
        let mut input =
            ScriptedInput::new(&["4", "999", "", "5", "abc", "", "3", "1", "999", "", "7"]);
        menu::run(service, &mut input).unwrap();
        assert_eq!(input.remaining(), 0);
        assert_eq!(service.list_all().unwrap().len(), 1);
    });
}
