//! Linear expressions over solver variables.

/// Opaque handle to a registered decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Ordinal of the variable in registration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A linear expression `sum(coeff_i * var_i) + constant`.
#[derive(Debug, Clone, Default)]
pub struct LinExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinExpr {
    /// The zero expression.
    pub fn zero() -> Self {
        LinExpr::default()
    }

    /// A constant expression.
    pub fn constant(value: f64) -> Self {
        LinExpr {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// The expression `1.0 * var`.
    pub fn variable(var: VarId) -> Self {
        LinExpr {
            terms: vec![(var, 1.0)],
            constant: 0.0,
        }
    }

    /// The expression `coeff * var`.
    pub fn term(var: VarId, coeff: f64) -> Self {
        LinExpr {
            terms: vec![(var, coeff)],
            constant: 0.0,
        }
    }

    /// Add `coeff * var` in place.
    pub fn add_term(&mut self, var: VarId, coeff: f64) {
        if coeff != 0.0 {
            self.terms.push((var, coeff));
        }
    }

    /// Add a constant in place.
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// Add `factor * other` in place.
    pub fn add_scaled(&mut self, other: &LinExpr, factor: f64) {
        if factor == 0.0 {
            return;
        }
        for (var, coeff) in &other.terms {
            self.add_term(*var, coeff * factor);
        }
        self.constant += other.constant * factor;
    }

    /// Add `other` in place.
    pub fn add_expr(&mut self, other: &LinExpr) {
        self.add_scaled(other, 1.0);
    }

    /// A scaled copy `factor * self`.
    pub fn scaled(&self, factor: f64) -> LinExpr {
        let mut out = LinExpr::zero();
        out.add_scaled(self, factor);
        out
    }

    /// The difference `self - other`.
    pub fn minus(&self, other: &LinExpr) -> LinExpr {
        let mut out = self.clone();
        out.add_scaled(other, -1.0);
        out
    }

    /// Variable terms in insertion order (duplicates possible; the backend
    /// accumulates them).
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// The constant offset.
    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    /// Whether the expression carries no variable term.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate under the given per-variable values.
    pub fn eval_with(&self, value_of: impl Fn(VarId) -> f64) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * value_of(*var))
            .sum::<f64>()
            + self.constant
    }
}

impl From<VarId> for LinExpr {
    fn from(var: VarId) -> Self {
        LinExpr::variable(var)
    }
}
