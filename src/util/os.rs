use std::{fs, io, path::Path};

/// Creates dirpath (and its parents) if needed, and makes it writable by the
/// owner only, for tables written by CsvWriter.
pub fn mk_writable_dir(dirpath: &Path) -> io::Result<()> {
    fs::create_dir_all(dirpath)?;

    let mut perms = fs::metadata(dirpath)?.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(0o700);
    }
    #[cfg(not(unix))]
    perms.set_readonly(false);
    fs::set_permissions(dirpath, perms)
}
