mod console;
mod persistence;
mod update;
