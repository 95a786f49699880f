mod common;
mod history;
