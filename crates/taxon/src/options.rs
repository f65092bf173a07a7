/// Configuration options shared by the parser and the formatter.
///
/// Options compose by plain struct update syntax:
///
/// ```rust
/// use taxon::Options;
///
/// let opts = Options {
///     json_mode: true,
///     ..Default::default()
/// };
/// assert!(!opts.bin_as_base64);
/// ```
///
/// # Default
///
/// All options default to `false`, which selects TAXON mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Run in strict-JSON mode.
    ///
    /// The parser will not interpret type annotators but leave them as plain
    /// strings. The formatter will output any value which would otherwise
    /// require annotation as an explicit `null`, and writes integers as
    /// floating-point numbers (inaccurate above 2^53).
    ///
    /// # Default
    ///
    /// `false`
    pub json_mode: bool,

    /// Encode binary data always in base64 and never in hex.
    ///
    /// This option has no effect on the parser, which accepts either
    /// encoding.
    ///
    /// # Default
    ///
    /// `false`
    pub bin_as_base64: bool,

    /// Bypass the check on levels of nested arrays and objects.
    ///
    /// By default the parser fails once a value is nested deeper than 32
    /// levels. Setting this option removes the limit; the caller must ensure
    /// the source text comes from a trusted origin. This option has no
    /// effect on the formatter.
    ///
    /// # Default
    ///
    /// `false`
    pub bypass_nesting_limit: bool,
}
