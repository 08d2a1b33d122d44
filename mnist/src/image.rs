use std::fmt;

use ann::{Matrix, Value};

const MAX_INTENSITY: Value = 255.0;

/// A labelled grayscale image. Pixels are stored row by row, one intensity byte each.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    pub label: u8,
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Image {
    pub fn pixel(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            let index = row.checked_mul(self.width)?.checked_add(col)?;
            self.pixels.get(index).copied()
        } else {
            None
        }
    }

    /// The image as a network input: a `(width * height) x 1` column of intensities in `[0, 1]`.
    pub fn to_input(&self) -> Matrix {
        normalize(&self.pixels)
    }

    /// Draws the image as text, darker pixels with denser characters.
    pub fn render(&self) -> String {
        const SHADES: [char; 5] = [' ', '.', ':', 'o', '@'];

        let mut output = String::with_capacity((self.width + 1) * self.height);
        for row in self.pixels.chunks(self.width.max(1)) {
            for &pixel in row {
                output.push(SHADES[pixel as usize * SHADES.len() / 256]);
            }
            output.push('\n');
        }
        output
    }
}

/// Scales raw intensities into `[0, 1]`, as a column matrix.
pub fn normalize(pixels: &[u8]) -> Matrix {
    Matrix::column(pixels.iter().map(|&p| p as Value).collect()) / MAX_INTENSITY
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "label: {}", self.label)?;
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> Image {
        Image {
            label: 3,
            width: 3,
            height: 2,
            pixels: vec![0, 51, 102, 153, 204, 255],
        }
    }

    #[test]
    fn pixel() {
        let image = image();
        assert_eq!(image.pixel(0, 0), Some(0));
        assert_eq!(image.pixel(1, 0), Some(153));
        assert_eq!(image.pixel(1, 2), Some(255));
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.pixel(0, 3), None);

        let short = Image {
            pixels: vec![1, 2],
            ..image
        };
        assert_eq!(short.pixel(0, 1), Some(2));
        assert_eq!(short.pixel(1, 1), None);
    }

    #[test]
    fn to_input() {
        let input = image().to_input();
        assert_eq!(input.shape(), (6, 1));
        assert_eq!(input.get(0, 0), Ok(0.0));
        assert_eq!(input.get(5, 0), Ok(1.0));
        assert!((input.get(1, 0).unwrap() - 0.2).abs() < 1e-6);
        assert!((input.get(3, 0).unwrap() - 0.6).abs() < 1e-6);
        assert!(input.values().iter().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn render() {
        assert_eq!(image().render(), "  .\n:o@\n");
    }
}
