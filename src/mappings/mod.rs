pub mod key_names;
