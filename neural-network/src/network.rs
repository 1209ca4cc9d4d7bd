use crate::activations::Activation;
use crate::loss;
use anyhow::{Result, anyhow};
use matrix::Matrix;
use std::fmt;

/// A fully-connected feed-forward classifier.
///
/// The network maps a batch of flattened images (one 784-wide row per
/// sample) through a stack of affine transforms with the configured
/// activation between them. No activation is applied after the final layer;
/// the output rows are raw logits, one score per class.
///
/// Parameters live only for the process lifetime. They are mutated in place
/// by [`Network::train_batch`] and by nothing else.
///
/// # Examples
///
/// ```
/// use neural_network::{Matrix, Network, RELU};
///
/// let network = Network::new(vec![784, 512, 512, 10], RELU);
/// let batch = Matrix::zeros(64, 784);
/// let logits = network.forward(&batch).unwrap();
/// assert_eq!((logits.rows(), logits.cols()), (64, 10));
/// ```
pub struct Network {
    /// The number of neurons in each layer, including input and output layers
    layers: Vec<usize>,
    /// Weight matrices between adjacent layers, stored input x output
    weights: Vec<Matrix>,
    /// Bias rows for each layer except the input layer
    biases: Vec<Matrix>,
    /// The activation applied after every layer except the last
    activation: Activation,
}

impl Network {
    /// Creates a new network with Glorot-uniform weights and zero biases.
    ///
    /// # Parameters
    ///
    /// * `layers` - Layer widths; the first element is the input width, the
    ///   last is the number of classes.
    /// * `activation` - The activation applied after every hidden layer.
    pub fn new(layers: Vec<usize>, activation: Activation) -> Self {
        assert!(
            layers.len() >= 2,
            "Network needs at least an input and an output layer"
        );

        let (weights, biases): (Vec<Matrix>, Vec<Matrix>) = layers
            .windows(2)
            .map(|window| (Matrix::glorot(window[0], window[1]), Matrix::zeros(1, window[1])))
            .unzip();

        Network {
            layers,
            weights,
            biases,
            activation,
        }
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    /// Computes logits for a batch of inputs.
    ///
    /// This is a pure read of the current parameters: no gradients are
    /// tracked and nothing is cached on the network, so two calls with the
    /// same input return identical output.
    ///
    /// # Errors
    ///
    /// Returns an error if the input width doesn't match the input layer.
    pub fn forward(&self, inputs: &Matrix) -> Result<Matrix> {
        self.check_input_width(inputs)?;

        let mut current = inputs.clone();
        let last = self.weights.len() - 1;
        for (i, (weights, biases)) in self.weights.iter().zip(&self.biases).enumerate() {
            let affine = current.dot(weights).add_row_broadcast(biases);
            current = if i == last {
                affine
            } else {
                affine.map(self.activation.function)
            };
        }

        Ok(current)
    }

    /// Runs one forward/backward/update cycle on a batch and returns the
    /// batch's mean cross-entropy loss.
    ///
    /// Gradients are recomputed from scratch on every call — there is no
    /// accumulated gradient state to clear between batches. The single
    /// side effect is the in-place SGD update of the weights and biases.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty, the input width is wrong,
    /// the label count doesn't match the batch, or a label is out of range.
    pub fn train_batch(
        &mut self,
        images: &Matrix,
        labels: &[u8],
        learning_rate: f64,
    ) -> Result<f64> {
        self.check_input_width(images)?;
        if labels.is_empty() {
            return Err(anyhow!("Cannot train on an empty batch"));
        }
        if images.rows() != labels.len() {
            return Err(anyhow!(
                "Batch has {} images but {} labels",
                images.rows(),
                labels.len()
            ));
        }

        // Forward pass, caching the pre-activation of every layer for the
        // backward pass.
        let last = self.weights.len() - 1;
        let mut pre_activations = Vec::with_capacity(self.weights.len());
        let mut activations = vec![images.clone()];
        for (i, (weights, biases)) in self.weights.iter().zip(&self.biases).enumerate() {
            let affine = activations[i].dot(weights).add_row_broadcast(biases);
            let activated = if i == last {
                affine.clone()
            } else {
                affine.map(self.activation.function)
            };
            pre_activations.push(affine);
            activations.push(activated);
        }

        let logits = &activations[self.weights.len()];
        let batch_loss = loss::cross_entropy(logits, labels)?;

        // Cross-entropy over softmax gives the output delta directly:
        // (softmax(logits) - one_hot(labels)) / batch_size.
        let classes = logits.cols();
        let mut delta_data = loss::softmax(logits).data().to_vec();
        for (row, &label) in delta_data.chunks_exact_mut(classes).zip(labels) {
            row[label as usize] -= 1.0;
        }
        let mut delta =
            Matrix::new(labels.len(), classes, delta_data).scale(1.0 / labels.len() as f64);

        // Walk the layers backwards. The delta for the layer below must be
        // computed with the pre-update weights, so the SGD step comes last.
        for i in (0..self.weights.len()).rev() {
            let weight_grad = activations[i].transpose().dot(&delta);
            let bias_grad = delta.sum_rows();

            if i > 0 {
                delta = delta
                    .dot(&self.weights[i].transpose())
                    .hadamard(&pre_activations[i - 1].map(self.activation.derivative));
            }

            self.weights[i] = self.weights[i].subtract(&weight_grad.scale(learning_rate));
            self.biases[i] = self.biases[i].subtract(&bias_grad.scale(learning_rate));
        }

        Ok(batch_loss)
    }

    fn check_input_width(&self, inputs: &Matrix) -> Result<()> {
        if inputs.cols() != self.layers[0] {
            return Err(anyhow!(
                "Invalid number of inputs: expected {}, got {}",
                self.layers[0],
                inputs.cols()
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Network {{ layers: {:?}, activation: {} }}",
            self.layers,
            self.activation.name()
        )
    }
}
