/// One segment of a [`Path`], with its points in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    CurveTo { x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64 },
    ClosePath,
}

/// Iterator over the segments of a [`Path`], see [`Path::iter`].
pub struct PathIter<'p> {
    data: &'p [ffi::cairo_path_data_t],
    index: usize,
}

impl Path {
    /// Iterate over the segments of the path.
    pub fn iter(&self) -> PathIter<'_> {
        let data = unsafe {
            let path = &*self.ptr;
            if path.data.is_null() || path.num_data <= 0 {
                &[][..]
            } else {
                std::slice::from_raw_parts(path.data, path.num_data as usize)
            }
        };
        PathIter { data, index: 0 }
    }
}

impl<'p> IntoIterator for &'p Path {
    type Item = PathSegment;
    type IntoIter = PathIter<'p>;

    fn into_iter(self) -> PathIter<'p> {
        self.iter()
    }
}

impl<'p> Iterator for PathIter<'p> {
    type Item = PathSegment;

    fn next(&mut self) -> Option<PathSegment> {
        loop {
            // each segment is a header followed by `length - 1` points
            let (kind, length) = unsafe {
                let header = &self.data.get(self.index)?.header;
                (header.type_, header.length.max(1) as usize)
            };
            let points = self.data.get(self.index + 1..self.index + length)?;
            self.index += length;

            let point = |i: usize| points.get(i).map(|p| unsafe { (p.point.x, p.point.y) });

            let segment = match kind {
                ffi::CAIRO_PATH_MOVE_TO => point(0).map(|(x, y)| PathSegment::MoveTo { x, y }),
                ffi::CAIRO_PATH_LINE_TO => point(0).map(|(x, y)| PathSegment::LineTo { x, y }),
                ffi::CAIRO_PATH_CURVE_TO => match (point(0), point(1), point(2)) {
                    (Some((x1, y1)), Some((x2, y2)), Some((x3, y3))) => Some(PathSegment::CurveTo {
                        x1,
                        y1,
                        x2,
                        y2,
                        x3,
                        y3,
                    }),
                    _ => None,
                },
                ffi::CAIRO_PATH_CLOSE_PATH => Some(PathSegment::ClosePath),
                _ => None,
            };

            // segments of an unknown type, or too short for their type, are stepped over
            if segment.is_some() {
                return segment;
            }
        }
    }
}
