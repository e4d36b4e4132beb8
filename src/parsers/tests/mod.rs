mod extract_tests;
mod page_kind_tests;
