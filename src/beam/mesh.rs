//! Beam discretization: span positions to nodes, nodes to DOFs

/// DOFs per beam node: transverse displacement and rotation
pub const DOFS_PER_NODE: usize = 2;

/// Ordered node set of a discretized beam
#[derive(Debug, Clone, PartialEq)]
pub struct BeamMesh {
    coords: Vec<f64>,
    merge_distance: f64,
}

/// An element between two adjacent mesh nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamElement {
    /// Element index; the element spans nodes `index` and `index + 1`
    pub index: usize,
    /// Start coordinate
    pub x1: f64,
    /// End coordinate
    pub x2: f64,
}

impl BeamElement {
    /// Node indices [start, end]
    pub fn nodes(&self) -> [usize; 2] {
        [self.index, self.index + 1]
    }

    /// Global DOFs [v1, θ1, v2, θ2]
    pub fn dofs(&self) -> [usize; 4] {
        let base = self.index * DOFS_PER_NODE;
        [base, base + 1, base + 2, base + 3]
    }

    /// Element length
    pub fn length(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Element midpoint
    pub fn midpoint(&self) -> f64 {
        (self.x1 + self.x2) / 2.0
    }
}

impl BeamMesh {
    /// Build the node set {0, L} ∪ `positions`, sorted and deduplicated
    ///
    /// Positions closer than `tolerance × length` collapse onto one node; the
    /// span ends always keep their exact coordinates. Positions are expected to
    /// lie within [0, length].
    pub fn discretize(length: f64, positions: impl IntoIterator<Item = f64>, tolerance: f64) -> Self {
        let merge_distance = tolerance * length;

        let mut all = vec![0.0, length];
        all.extend(positions);
        all.sort_by(f64::total_cmp);

        let mut coords: Vec<f64> = Vec::with_capacity(all.len());
        for x in all {
            match coords.last() {
                Some(&last) if x - last <= merge_distance => {}
                _ => coords.push(x),
            }
        }

        // A position just short of L would otherwise stand in for the end node
        if let Some(last) = coords.last_mut() {
            *last = length;
        }

        Self {
            coords,
            merge_distance,
        }
    }

    /// Node coordinates in ascending order
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.coords.len()
    }

    /// Number of elements
    pub fn num_elements(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    /// Total DOFs
    pub fn num_dofs(&self) -> usize {
        self.num_nodes() * DOFS_PER_NODE
    }

    /// Index of the node at position `x`, within the merge distance
    pub fn node_index(&self, x: f64) -> Option<usize> {
        let idx = self.coords.partition_point(|&c| c < x - self.merge_distance);
        self.coords
            .get(idx)
            .filter(|&&c| (c - x).abs() <= self.merge_distance)
            .map(|_| idx)
    }

    /// Iterate over the elements in span order
    pub fn elements(&self) -> impl Iterator<Item = BeamElement> + '_ {
        self.coords.windows(2).enumerate().map(|(index, w)| BeamElement {
            index,
            x1: w[0],
            x2: w[1],
        })
    }

    /// The element owning position `x`, or `None` outside the span
    ///
    /// Interior nodes belong to the element on their right; the end node
    /// belongs to the last element.
    pub fn element_containing(&self, x: f64) -> Option<BeamElement> {
        let n_elements = self.num_elements();
        let (first, last) = (*self.coords.first()?, *self.coords.last()?);
        if n_elements == 0 || x < first - self.merge_distance || x > last + self.merge_distance {
            return None;
        }

        let index = self
            .coords
            .partition_point(|&c| c <= x)
            .saturating_sub(1)
            .min(n_elements - 1);

        Some(BeamElement {
            index,
            x1: self.coords[index],
            x2: self.coords[index + 1],
        })
    }
}
