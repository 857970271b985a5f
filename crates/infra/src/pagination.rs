#[derive(Debug, Clone, Copy)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

impl LimitOffset {
    /// Clamp user-supplied values into something the database can serve.
    pub fn clamped(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, 200),
            offset: offset.max(0),
        }
    }
}
