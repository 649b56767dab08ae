use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rand::Rng;

use crate::gene::Genome;
use crate::node::{ActionKind, Node, NodeKind, SenseKind};

/// A selected action, scaled by the raw accumulated signal that chose it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub strength: f32,
}

/// The feed-forward network compiled from a [`Genome`].
///
/// Construction lazily materializes one node per distinct `(kind)` referenced
/// by a gene, wires one edge per gene, then prunes dead nodes to a fixpoint:
/// a dead INNER node has no live non-self input or live output; SENSE/ACTION
/// nodes are then pruned if they have no surviving edge at all.
#[derive(Debug, Clone)]
pub struct Brain {
    graph: Graph<Node, f32>,
    senses: Vec<NodeIndex>,
    actions: Vec<NodeIndex>,
}

impl Brain {
    pub fn build(genome: &Genome, num_inner: u32) -> Self {
        let mut graph: Graph<Node, f32> = Graph::new();
        let mut index_of: HashMap<NodeKind, NodeIndex> = HashMap::new();

        let mut node_for = |graph: &mut Graph<Node, f32>, index_of: &mut HashMap<NodeKind, NodeIndex>, kind: NodeKind| -> NodeIndex {
            *index_of.entry(kind).or_insert_with(|| graph.add_node(Node::new(kind)))
        };

        for gene in genome.genes() {
            let input_kind = gene.input_node_kind(num_inner);
            let output_kind = gene.output_node_kind(num_inner);
            let from = node_for(&mut graph, &mut index_of, input_kind);
            let to = node_for(&mut graph, &mut index_of, output_kind);
            graph.add_edge(from, to, gene.weight());
        }

        Self::prune(&mut graph);

        let senses = graph
            .node_indices()
            .filter(|&n| graph[n].kind.is_sense())
            .collect();
        let actions = graph
            .node_indices()
            .filter(|&n| graph[n].kind.is_action())
            .collect();

        Brain { graph, senses, actions }
    }

    /// Iteratively removes dead nodes until a fixpoint is reached.
    ///
    /// A pass: drop INNER nodes with no live incoming edge from a node other
    /// than itself, and no live outgoing edge to a node other than itself.
    /// Repeat while any inner node is still dropped, since removing one can
    /// strand another. Once inner nodes have stabilized, drop any SENSE node
    /// with no outgoing edge and any ACTION node with no incoming edge.
    fn prune(graph: &mut Graph<Node, f32>) {
        loop {
            let mut dead = Vec::new();
            for n in graph.node_indices() {
                if !graph[n].kind.is_inner() {
                    continue;
                }
                let has_live_input = graph
                    .neighbors_directed(n, Direction::Incoming)
                    .any(|src| src != n);
                let has_live_output = graph
                    .neighbors_directed(n, Direction::Outgoing)
                    .any(|dst| dst != n);
                if !has_live_input || !has_live_output {
                    dead.push(n);
                }
            }
            if dead.is_empty() {
                break;
            }
            graph.retain_nodes(|g, n| !dead.contains(&n) || !g[n].kind.is_inner());
        }

        graph.retain_nodes(|g, n| match g[n].kind {
            NodeKind::Sense(_) => {
                g.neighbors_directed(n, Direction::Outgoing).next().is_some()
            }
            NodeKind::Action(_) => {
                g.neighbors_directed(n, Direction::Incoming).next().is_some()
            }
            NodeKind::Inner(_) => true,
        });
    }

    pub fn live_node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn reset(&mut self) {
        for n in self.graph.node_indices() {
            self.graph[n].value = 0.0;
        }
    }

    /// Runs one evaluation pass: live SENSE node values are populated via
    /// `sense_fn`, signal flows SENSE -> INNER -> ACTION in a single sweep
    /// (not a fixed-point solve — a node reads whatever value its inputs
    /// hold *this step*, including zero for an input not yet visited).
    /// INNER nodes hold the plain weighted sum of their inputs; the
    /// tanh squash is applied only when sampling an ACTION node's trigger
    /// probability, never stored back into the node's value.
    pub fn evaluate(&mut self, mut sense_fn: impl FnMut(SenseKind) -> f32, rng: &mut impl Rng) -> Vec<Action> {
        self.reset();

        for &n in &self.senses {
            if let NodeKind::Sense(kind) = self.graph[n].kind {
                self.graph[n].value = sense_fn(kind);
            }
        }

        let inners: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&n| self.graph[n].kind.is_inner())
            .collect();
        let actions: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&n| self.graph[n].kind.is_action())
            .collect();

        for &n in inners.iter().chain(actions.iter()) {
            self.graph[n].value = self.weighted_input_sum(n);
        }

        let mut fired = Vec::new();
        for &n in &self.actions {
            if let NodeKind::Action(kind) = self.graph[n].kind {
                let raw_sum = self.graph[n].value;
                let probability = (raw_sum.tanh() + 1.0) / 2.0;
                if rng.gen_bool(probability as f64) {
                    fired.push(Action { kind, strength: raw_sum });
                }
            }
        }
        fired
    }

    fn weighted_input_sum(&self, n: NodeIndex) -> f32 {
        let mut sum = 0.0f32;
        let mut edges: Vec<_> = self.graph.edges_directed(n, Direction::Incoming).collect();
        edges.sort_by_key(|e| e.id().index());
        for edge in edges {
            let src = edge.source();
            if src == n {
                continue;
            }
            sum += self.graph[src].value * *edge.weight();
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::Gene;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn gene_for(input: NodeKind, output: NodeKind, num_inner: u32, weight_raw: u32) -> Gene {
        // construct a raw word that decodes to the requested endpoints
        let input_bit = match input {
            NodeKind::Inner(_) => 1u32,
            _ => 0u32,
        };
        let input_id = match input {
            NodeKind::Sense(s) => s as u32,
            NodeKind::Inner(i) => i,
            _ => unreachable!(),
        };
        let output_bit = match output {
            NodeKind::Action(_) => 1u32,
            _ => 0u32,
        };
        let output_id = match output {
            NodeKind::Action(a) => a as u32,
            NodeKind::Inner(i) => i,
            _ => unreachable!(),
        };
        let _ = num_inner;

        let mut word = 0u32;
        word |= input_bit << 23;
        word |= (input_id & 0x3F) << 17;
        word |= output_bit << 15;
        word |= (output_id & 0x3F) << 9;
        word |= weight_raw & 0xFF;
        Gene::from_raw(word)
    }

    #[test]
    fn dead_inner_chain_prunes_to_empty_brain() {
        // SENSE -> INNER_A -> INNER_B -> INNER_C, with C having no outgoing edge.
        let genes = vec![
            gene_for(NodeKind::Sense(SenseKind::XLoc), NodeKind::Inner(0), 3, 128),
            gene_for(NodeKind::Inner(0), NodeKind::Inner(1), 3, 128),
            gene_for(NodeKind::Inner(1), NodeKind::Inner(2), 3, 128),
        ];
        let genome = Genome::from_genes_for_test(genes);
        let brain = Brain::build(&genome, 3);
        assert_eq!(brain.live_node_count(), 0);
    }

    fn test_genome_from(genes: Vec<Gene>) -> Genome {
        Genome::from_genes_for_test(genes)
    }

    #[test]
    fn single_direct_edge_survives_pruning() {
        let genes = vec![gene_for(
            NodeKind::Sense(SenseKind::Age),
            NodeKind::Action(ActionKind::MoveForward),
            0,
            200,
        )];
        let genome = test_genome_from(genes);
        let mut brain = Brain::build(&genome, 0);
        assert_eq!(brain.live_node_count(), 2);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let actions = brain.evaluate(|_| 1.0, &mut rng);
        // action may or may not fire depending on sampled probability, but
        // must not panic and must only ever report the one wired action.
        for a in actions {
            assert_eq!(a.kind, ActionKind::MoveForward);
        }
    }
}
