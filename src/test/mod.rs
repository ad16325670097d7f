
mod menu;





trait TestSliceExt {
    fn as_str(&self) -> &str;
}

impl TestSliceExt for [u8] {
    fn as_str(&self) -> &str {
        std::str::from_utf8(self).unwrap()
    }
}
