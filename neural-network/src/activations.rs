/// An elementwise activation function paired with its derivative.
///
/// The derivative is taken with respect to the pre-activation input, so the
/// backward pass applies it to the cached affine outputs, not to the
/// activated values.
#[derive(Clone, Copy, Debug)]
pub struct Activation {
    pub function: fn(f64) -> f64,
    pub derivative: fn(f64) -> f64,
    name: &'static str,
}

impl Activation {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

pub const RELU: Activation = Activation {
    function: |x| if x > 0.0 { x } else { 0.0 },
    derivative: |x| if x > 0.0 { 1.0 } else { 0.0 },
    name: "relu",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_function() {
        assert_eq!((RELU.function)(3.5), 3.5);
        assert_eq!((RELU.function)(-2.0), 0.0);
        assert_eq!((RELU.function)(0.0), 0.0);
    }

    #[test]
    fn test_relu_derivative() {
        assert_eq!((RELU.derivative)(3.5), 1.0);
        assert_eq!((RELU.derivative)(-2.0), 0.0);
    }
}
