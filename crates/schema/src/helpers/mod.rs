pub mod easy_json;
