use std::fmt::Write;

use crate::raster::Symbol;

/*---- Vector and text renderings of a symbol ----*/

/// Returns a string of SVG code for an image depicting the given symbol, with
/// the given number of border modules.
///
/// The string always uses Unix newlines (\n), regardless of the platform.
///
/// # Example
///
/// ```
/// use qrbuilder::config::ErrorCorrection;
/// use qrbuilder::raster::{QrCodeEngine, SymbologyEngine};
/// use qrbuilder::render::to_svg_string;
///
/// let symbol = QrCodeEngine.encode("HELLO WORLD", ErrorCorrection::Low).unwrap();
/// let svg = to_svg_string(&symbol, 4);
/// assert!(svg.ends_with("</svg>\n"));
/// ```
pub fn to_svg_string(symbol: &Symbol, border: u32) -> String {
    let border = i64::from(border);
    let size = symbol.width() as i64;
    let dimension = size + border * 2;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
               \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    let _ = writeln!(
        result,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
         viewBox=\"0 0 {0} {0}\" stroke=\"none\">",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..size {
        for x in 0..size {
            if symbol.is_dark(x, y) {
                if !first {
                    result += " ";
                }
                first = false;
                let _ = write!(result, "M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Draws the symbol with block characters, two per module so it looks square
/// in a terminal. Each row ends with a newline.
pub fn to_terminal_string(symbol: &Symbol, border: u32) -> String {
    let border = i64::from(border);
    let size = symbol.width() as i64;
    let mut result = String::new();
    for y in -border..size + border {
        for x in -border..size + border {
            let c = if symbol.is_dark(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}
