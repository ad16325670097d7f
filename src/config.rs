/// Settings shared by all sessions.
///
/// ```
/// use gophtml::Config;
///
/// let config = Config::new()
///     .inline_images(true)
///     .title_prefix("Gopher menu: ");
///
/// assert!(config.is_inline_images());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    inline_images: bool,
    line_breaks: bool,
    stylesheet: String,
    icon: String,
    title_prefix: String,
    max_line_len: usize,
    guess_mime_from_extension: bool,
}

/// Longest line we buffer while waiting for its terminator.
pub const DEFAULT_MAX_LINE_LEN: usize = 16 * 1024;

impl Default for Config {
    fn default() -> Self {
        Config {
            inline_images: false,
            line_breaks: false,
            stylesheet: "resource:internal.css".into(),
            icon: "resource:icons/directory.png".into(),
            title_prefix: "Index of ".into(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            guess_mime_from_extension: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render image items as `<img>` in addition to the link.
    ///
    /// Off by default, some menus list hundreds of images.
    pub fn inline_images(mut self, v: bool) -> Self {
        self.inline_images = v;
        self
    }

    /// Put a newline after each generated fragment.
    pub fn line_breaks(mut self, v: bool) -> Self {
        self.line_breaks = v;
        self
    }

    pub fn stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheet = href.into();
        self
    }

    pub fn icon(mut self, href: impl Into<String>) -> Self {
        self.icon = href.into();
        self
    }

    /// Text before the path in the page `<title>`.
    pub fn title_prefix(mut self, v: impl Into<String>) -> Self {
        self.title_prefix = v.into();
        self
    }

    /// Max bytes of an unterminated line before the session gives up.
    pub fn max_line_len(mut self, v: usize) -> Self {
        self.max_line_len = v;
        self
    }

    /// Guess a content type from the selector's file extension when the
    /// item type does not tell.
    pub fn guess_mime_from_extension(mut self, v: bool) -> Self {
        self.guess_mime_from_extension = v;
        self
    }

    pub fn is_inline_images(&self) -> bool {
        self.inline_images
    }

    pub fn is_line_breaks(&self) -> bool {
        self.line_breaks
    }

    pub fn get_stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn get_icon(&self) -> &str {
        &self.icon
    }

    pub fn get_title_prefix(&self) -> &str {
        &self.title_prefix
    }

    pub fn get_max_line_len(&self) -> usize {
        self.max_line_len
    }

    pub fn is_guess_mime_from_extension(&self) -> bool {
        self.guess_mime_from_extension
    }
}
