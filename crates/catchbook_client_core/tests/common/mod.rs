pub mod fake_sheet;
pub mod test_helpers;
