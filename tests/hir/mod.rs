pub mod tests_date_validation;
