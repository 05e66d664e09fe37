//! Deduplicated table of literal constants destined for the `.data`
//! section, plus a separate monotonic counter for jump labels. Both
//! counters are process-local to one `ConstantPool`/compilation rather
//! than global state.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstantKey {
    Int(i64),
    FloatBits(u64),
    Str(String),
}

#[derive(Debug, Clone)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Default)]
pub struct ConstantPool {
    entries: Vec<Constant>,
    index: HashMap<ConstantKey, usize>,
    next_jump: usize,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_int(&mut self, value: i64) -> String {
        self.intern(ConstantKey::Int(value), Constant::Int(value))
    }

    pub fn intern_float(&mut self, value: f64) -> String {
        self.intern(ConstantKey::FloatBits(value.to_bits()), Constant::Float(value))
    }

    pub fn intern_str(&mut self, value: &str) -> String {
        self.intern(ConstantKey::Str(value.to_string()), Constant::Str(value.to_string()))
    }

    fn intern(&mut self, key: ConstantKey, value: Constant) -> String {
        if let Some(&idx) = self.index.get(&key) {
            return format!("const{}", idx);
        }
        let idx = self.entries.len();
        self.entries.push(value);
        self.index.insert(key, idx);
        format!("const{}", idx)
    }

    pub fn entries(&self) -> impl Iterator<Item = (String, &Constant)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, c)| (format!("const{}", idx), c))
    }

    /// Allocates the next `.jumpN` label. Shares no counter with the
    /// constant pool's own `constN` names — jump labels are assembled
    /// code positions, not `.data` entries.
    pub fn next_jump_label(&mut self) -> String {
        let label = format!(".jump{}", self.next_jump);
        self.next_jump += 1;
        label
    }
}

/// NASM requires a decimal point to disambiguate a double literal from
/// an integer; `1` and `1.0` are different directives to `dq`. Always
/// emit one, even for whole-number floats.
pub fn format_float_literal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_equal_constants() {
        let mut pool = ConstantPool::new();
        let a = pool.intern_int(42);
        let b = pool.intern_int(42);
        assert_eq!(a, b);
        assert_eq!(pool.entries().count(), 1);
    }

    #[test]
    fn distinct_constants_get_distinct_names() {
        let mut pool = ConstantPool::new();
        let a = pool.intern_int(1);
        let b = pool.intern_int(2);
        assert_ne!(a, b);
    }

    #[test]
    fn jump_labels_are_independent_of_constant_indices() {
        let mut pool = ConstantPool::new();
        pool.intern_int(1);
        assert_eq!(pool.next_jump_label(), ".jump0");
        assert_eq!(pool.next_jump_label(), ".jump1");
    }

    #[test]
    fn whole_number_floats_keep_a_decimal_point() {
        assert_eq!(format_float_literal(1.0), "1.0");
        assert_eq!(format_float_literal(2.5), "2.5");
    }
}
