use crate::error::RenderError;

/// Canvas size in pixels
///
/// # Examples
///
/// ```
/// use camconv_render::ImageSize;
///
/// let size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(size.width, 10);
/// assert_eq!(size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageSize {
    /// Width of the canvas in pixels
    pub width: usize,
    /// Height of the canvas in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// A single channel grid of intensities stored row-major with shape (H, W).
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    size: ImageSize,
    data: Vec<f32>,
}

impl Canvas {
    /// Create a new canvas from intensity data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the canvas in pixels.
    /// * `data` - The intensities in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the canvas size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use camconv_render::{Canvas, ImageSize};
    ///
    /// let canvas = Canvas::new(
    ///     ImageSize {
    ///         width: 3,
    ///         height: 2,
    ///     },
    ///     vec![0.0; 6],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(canvas.rows(), 2);
    /// assert_eq!(canvas.cols(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<f32>) -> Result<Self, RenderError> {
        if data.len() != size.width * size.height {
            return Err(RenderError::InvalidCanvasData(
                data.len(),
                size.width * size.height,
            ));
        }
        Ok(Self { size, data })
    }

    /// Create a new canvas with every pixel set to `val`.
    pub fn from_size_val(size: ImageSize, val: f32) -> Self {
        Self {
            size,
            data: vec![val; size.width * size.height],
        }
    }

    /// Create a canvas from 8-bit greyscale data, mapping `[0, 255]` onto `[0, 1]`.
    pub fn from_u8_normalized(size: ImageSize, data: &[u8]) -> Result<Self, RenderError> {
        Self::new(size, data.iter().map(|&v| v as f32 / 255.0).collect())
    }

    /// Get the size of the canvas in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the canvas in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the canvas in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the canvas.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the canvas.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the number of pixels.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the intensities as a row-major slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get the intensity at column `x` and row `y`, if inside the canvas.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(self.data[y * self.size.width + x])
    }

    /// Set the intensity at column `x` and row `y`.
    ///
    /// Returns `false` and leaves the canvas untouched if the pixel is outside.
    pub fn set_pixel(&mut self, x: usize, y: usize, val: f32) -> bool {
        if x >= self.size.width || y >= self.size.height {
            return false;
        }
        self.data[y * self.size.width + x] = val;
        true
    }

    /// Swap rows and columns, returning a new canvas of size (W, H).
    pub fn transpose(&self) -> Self {
        let (rows, cols) = (self.rows(), self.cols());
        let mut data = vec![0.0; self.data.len()];
        for (r, row) in self.data.chunks_exact(cols.max(1)).enumerate() {
            for (c, &val) in row.iter().enumerate() {
                data[c * rows + r] = val;
            }
        }
        Self {
            size: ImageSize {
                width: rows,
                height: cols,
            },
            data,
        }
    }

    /// Iterate over the `(x, y)` positions whose intensity satisfies `predicate`.
    pub fn positions_where<'a>(
        &'a self,
        predicate: impl Fn(f32) -> bool + 'a,
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        let width = self.size.width;
        self.data
            .iter()
            .enumerate()
            .filter(move |(_, v)| predicate(**v))
            .map(move |(i, _)| (i % width, i / width))
    }
}
