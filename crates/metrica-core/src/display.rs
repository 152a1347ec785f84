use std::fmt::{self, Write};

use crate::element::Element;
use crate::error::Result;
use crate::layout::IndexIter;
use crate::tensor::Tensor;

// Printing
//
// Human-readable dumps, not a stable machine format:
//
//   rank 0   →  the bare value
//   rank 1   →  one space-separated line
//   rank 2   →  one line per row
//   rank ≥ 3 →  a "Slice i :" block per leading index, each a rank-2 grid
//
// `{}` renders with the default options, `{:#}` adds a "Shape: ..." header,
// and `{:.3}` forwards the precision to every element.

/// Rendering options for [`Tensor::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Digits after the decimal point, forwarded to each element's
    /// `Display` impl. `None` prints elements as they format themselves.
    pub precision: Option<usize>,
    /// Separator between elements on one line.
    pub separator: String,
    /// Whether to prefix the dump with a `Shape: ...` line.
    pub show_shape: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            precision: None,
            separator: " ".to_string(),
            show_shape: false,
        }
    }
}

impl PrintOptions {
    pub fn precision(mut self, p: usize) -> Self {
        self.precision = Some(p);
        self
    }

    pub fn separator(mut self, sep: impl Into<String>) -> Self {
        self.separator = sep.into();
        self
    }

    pub fn show_shape(mut self, show: bool) -> Self {
        self.show_shape = show;
        self
    }
}

fn write_value<T: Element>(out: &mut impl Write, value: &T, opts: &PrintOptions) -> fmt::Result {
    match opts.precision {
        Some(p) => write!(out, "{:.*}", p, value),
        None => write!(out, "{}", value),
    }
}

fn write_line<T: Element>(out: &mut impl Write, values: &[T], opts: &PrintOptions) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.write_str(&opts.separator)?;
        }
        write_value(out, v, opts)?;
    }
    Ok(())
}

fn write_grid<T: Element>(
    out: &mut impl Write,
    values: &[T],
    rows: usize,
    cols: usize,
    opts: &PrintOptions,
) -> fmt::Result {
    for r in 0..rows {
        if r > 0 {
            out.write_char('\n')?;
        }
        write_line(out, &values[r * cols..(r + 1) * cols], opts)?;
    }
    Ok(())
}

fn write_tensor<T: Element>(out: &mut impl Write, t: &Tensor<T>, opts: &PrintOptions) -> fmt::Result {
    if opts.show_shape {
        out.write_str("Shape:")?;
        if t.rank() == 0 {
            out.write_str(" scalar")?;
        }
        for d in t.dims() {
            write!(out, " {}", d)?;
        }
        out.write_char('\n')?;
    }

    let dims = t.dims();
    match t.rank() {
        0 => write_value(out, &t.data()[0], opts),
        1 => write_line(out, t.data(), opts),
        2 => write_grid(out, t.data(), dims[0], dims[1], opts),
        rank => {
            let (rows, cols) = (dims[rank - 2], dims[rank - 1]);
            let block = rows * cols;
            for (n, lead) in IndexIter::new(&dims[..rank - 2]).enumerate() {
                if n > 0 {
                    out.write_str("\n\n")?;
                }
                if let [i] = lead.as_slice() {
                    writeln!(out, "Slice {} :", i)?;
                } else {
                    let lead: Vec<String> = lead.iter().map(|i| i.to_string()).collect();
                    writeln!(out, "Slice ({}) :", lead.join(", "))?;
                }
                write_grid(out, &t.data()[n * block..(n + 1) * block], rows, cols, opts)?;
            }
            Ok(())
        }
    }
}

impl<T: Element> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut opts = PrintOptions::default().show_shape(f.alternate());
        opts.precision = f.precision();
        write_tensor(f, self, &opts)
    }
}

impl<T: Element> Tensor<T> {
    /// Render with explicit options.
    ///
    /// Fails with `Error::Format` if an element's `Display` impl fails.
    pub fn render(&self, opts: &PrintOptions) -> Result<String> {
        let mut out = String::new();
        write_tensor(&mut out, self, opts)?;
        Ok(out)
    }

    /// Entry-by-entry dump:
    ///
    /// ```text
    /// Tensor (shape: 2 x 2):
    /// (0, 0) = 1
    /// (0, 1) = 2
    /// ...
    /// ```
    pub fn describe(&self) -> Result<String> {
        let dims: Vec<String> = self.dims().iter().map(|d| d.to_string()).collect();
        let mut out = format!("Tensor (shape: {}):\n", dims.join(" x "));
        for (idx, value) in self.indices().zip(self.data()) {
            let idx: Vec<String> = idx.iter().map(|i| i.to_string()).collect();
            writeln!(out, "({}) = {}", idx.join(", "), value)?;
        }
        Ok(out)
    }

    /// Print to stdout; `detailed` adds the shape header.
    pub fn print(&self, detailed: bool) -> Result<()> {
        println!("{}", self.render(&PrintOptions::default().show_shape(detailed))?);
        Ok(())
    }
}
