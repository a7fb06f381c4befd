/// Error returned by [`Surface::write_to_png_stream`].
#[derive(Debug)]
pub enum WriteError {
    /// The writer failed. cairo only reports a generic write error in this case, so this takes precedence.
    Io(std::io::Error),
    Status(Status),
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::Io(e) => write!(f, "writing PNG data failed: {e}"),
            WriteError::Status(s) => write!(f, "writing PNG data failed: {s}"),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Io(e) => Some(e),
            WriteError::Status(s) => Some(s),
        }
    }
}

struct PngStream<'w, W: std::io::Write> {
    writer: &'w mut W,
    error: Option<std::io::Error>,
}

unsafe extern "C" fn write_png_chunk<W: std::io::Write>(
    closure: *mut c_void,
    data: *const u8,
    length: c_uint,
) -> ffi::cairo_status_t {
    let stream = &mut *(closure as *mut PngStream<W>);
    if stream.error.is_some() {
        return ffi::CAIRO_STATUS_WRITE_ERROR;
    }

    let chunk = std::slice::from_raw_parts(data, length as usize);
    match stream.writer.write_all(chunk) {
        Ok(()) => ffi::CAIRO_STATUS_SUCCESS,
        Err(e) => {
            stream.error = Some(e);
            ffi::CAIRO_STATUS_WRITE_ERROR
        }
    }
}

impl Surface {
    /// See `cairo_surface_write_to_png_stream`.
    pub fn write_to_png_stream<W: std::io::Write>(&self, writer: &mut W) -> Result<(), WriteError> {
        let mut stream = PngStream {
            writer,
            error: None,
        };
        let status = unsafe {
            Status(ffi::cairo_surface_write_to_png_stream(
                self.ptr,
                Some(write_png_chunk::<W>),
                &mut stream as *mut PngStream<W> as *mut c_void,
            ))
        };

        if let Some(e) = stream.error {
            return Err(WriteError::Io(e));
        }
        status.to_result().map_err(WriteError::Status)
    }
}
