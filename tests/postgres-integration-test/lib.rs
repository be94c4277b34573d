#![cfg(feature = "docker-tests")]

mod test_menu;
