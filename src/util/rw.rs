use std::{cell::RefCell, fmt::Write, io, rc::Rc};

pub struct StringBuffer {
    s: String,
}

impl StringBuffer {
    pub fn new() -> StringBuffer {
        StringBuffer{s: String::new()}
    }

    pub fn as_str(&self) -> &str {
        self.s.as_str()
    }

    /// Takes the buffered contents, leaving the buffer empty.
    pub fn export_string(&mut self) -> String {
        std::mem::take(&mut self.s)
    }
}

// String only implements fmt::Write
impl io::Write for StringBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let str_rep = std::str::from_utf8(buf)
            .map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, e)
            })?;
        let res = self.s.write_str(str_rep);
        match res {
            Ok(_) => Ok(buf.len()),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn shared<T>(t: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(t))
}

// A shared stream writer, so output and user-facing errors can go to
// stdout/stderr, or be captured in tests.
#[derive(Clone)]
pub struct WriteHandle {
    w: Rc<RefCell<dyn io::Write>>,
}

impl WriteHandle {
    pub fn stdout_write_handle() -> WriteHandle {
        WriteHandle { w: shared(io::stdout()) }
    }

    pub fn stderr_write_handle() -> WriteHandle {
        WriteHandle { w: shared(io::stderr()) }
    }

    pub fn string_buff_write_handle() -> (WriteHandle, Rc<RefCell<StringBuffer>>) {
        let buffer = shared(StringBuffer::new());
        (WriteHandle { w: buffer.clone() }, buffer)
    }
}

impl io::Write for WriteHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.w.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.w.borrow_mut().flush()
    }
}

#[macro_export]
macro_rules! write_errln {
    ($w:expr, $($arg:tt)*) => {{
        use std::io::Write;
        let _ = writeln!($w, $($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{StringBuffer, WriteHandle};

    #[test]
    fn test_string_buffer() {
        let mut buff = StringBuffer::new();
        let _ = write!(buff, "Some {}", "text");
        let _ = writeln!(buff, " 1");
        assert_eq!(buff.as_str(), "Some text 1\n");
        assert_eq!(buff.export_string(), "Some text 1\n");
        assert_eq!(buff.as_str(), "");
    }

    #[test]
    fn test_write_handle() {
        let (mut handle, buff)
            = WriteHandle::string_buff_write_handle();
        let _ = write!(handle, "Some {}", "text");
        let _ = writeln!(handle, " 1");
        assert_eq!(buff.borrow().as_str(), "Some text 1\n");

        let mut other = handle.clone();
        write_errln!(other, "more");
        assert_eq!(buff.borrow().as_str(), "Some text 1\nmore\n");
    }
}
