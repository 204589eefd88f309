#![allow(dead_code)]

use std::{fs, path::PathBuf};

use corretagem::peripheral::nota_extract_impl::{run_with_args, Args};
use corretagem::util::rw::WriteHandle;

fn test_temp_dir_path() -> PathBuf {
    let tmpdir = std::env::temp_dir();
    (1..1000000)
        .map(|val| tmpdir.join(format!("corretagem-test-{}", val)))
        .find(|path| !path.exists())
        .expect("Could not create temp directory path that does not already exist")
}

/// A fresh path under the temp dir, which is removed (if it was created) on
/// drop.
pub struct NonAutoCreatingTestDir {
    pub path: PathBuf,
}

impl NonAutoCreatingTestDir {
    pub fn new() -> NonAutoCreatingTestDir {
        NonAutoCreatingTestDir {
            path: test_temp_dir_path(),
        }
    }
}

impl Drop for NonAutoCreatingTestDir {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        let skip_env_var = "SKIP_TEMP_DIR_CLEANUP_ON_FAIL";
        if std::thread::panicking() && corretagem::util::sys::env_var_non_empty(skip_env_var) {
            println!("Panicking. Skipping remove of {}", self.path.display());
        } else {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

pub fn run_test<T>(name: &str, test: T)
where
    T: FnOnce() + std::panic::UnwindSafe,
{
    println!("Running test: {}", name);
    if let Err(e) = std::panic::catch_unwind(test) {
        panic!("{name} failed: {e:#?}");
    }
}

pub fn data_file(name: &str) -> PathBuf {
    PathBuf::from("tests/data/notes").join(name)
}

pub fn read_data_file(name: &str) -> String {
    fs::read_to_string(data_file(name)).unwrap()
}

/// Args as from the command line, with only the files set.
pub fn args_for(files: &[&str]) -> Args {
    use clap::Parser;
    let mut argv = vec!["nota-extract".to_string()];
    argv.extend(files.iter().map(|f| data_file(f).display().to_string()));
    Args::parse_from(argv)
}

/// Returns (result, stdout, stderr)
pub fn run_and_get_output(args: Args) -> (Result<(), ()>, String, String) {
    let (out_w, out_b) = WriteHandle::string_buff_write_handle();
    let (err_w, err_b) = WriteHandle::string_buff_write_handle();
    let res = run_with_args(args, out_w, err_w);
    let out = out_b.borrow_mut().export_string();
    let err = err_b.borrow_mut().export_string();
    (res, out, err)
}
