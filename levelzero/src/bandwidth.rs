// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The XeLink bandwidth matrix.
//!
//! Rows and columns follow the [`Registry`].  Cell `[i][j]` is the bandwidth in MB/s received over
//! every link from a port of node `i` to a port of node `j`.  When both ends of a link are
//! subdevices, the same bandwidth is also added between their root devices, so a root to root
//! cell holds its direct links plus everything its subdevices exchange with the peer's
//! subdevices.
//!
//! Once links are summed, a device, its subdevices and every pair among them get the configured
//! local bandwidth, which is larger than any link.

use std::collections::HashMap;

use hardware::distances::{DistancesAddFlags, DistancesError, DistancesKind};
use hardware::topology::Topology;
use tracing::debug;

use crate::config::DiscoveryConfig;
use crate::keys;
use crate::ports::{Port, PortList};
use crate::registry::Registry;
use crate::sink::DistancesSink;
use crate::ze::types::FabricPortId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BandwidthError {
    #[error("can not allocate a {size}x{size} bandwidth matrix")]
    Allocation { size: usize },
}

/// A square matrix of bandwidths in MB/s, row major.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BandwidthMatrix {
    size: usize,
    values: Vec<u64>,
}

impl BandwidthMatrix {
    /// A `size` by `size` matrix of zeros.
    ///
    /// # Errors
    ///
    /// Fails if the matrix does not fit in memory.
    pub fn zeroed(size: usize) -> Result<Self, BandwidthError> {
        let cells = size
            .checked_mul(size)
            .ok_or(BandwidthError::Allocation { size })?;
        let mut values = Vec::new();
        values
            .try_reserve_exact(cells)
            .map_err(|_| BandwidthError::Allocation { size })?;
        values.resize(cells, 0);
        Ok(Self { size, values })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<u64> {
        self.cell(from, to).map(|cell| self.values[cell])
    }

    /// Add `value` to cell `[from][to]`, saturating.
    pub fn add(&mut self, from: usize, to: usize, value: u64) {
        if let Some(cell) = self.cell(from, to) {
            self.values[cell] = self.values[cell].saturating_add(value);
        }
    }

    pub fn set(&mut self, from: usize, to: usize, value: u64) {
        if let Some(cell) = self.cell(from, to) {
            self.values[cell] = value;
        }
    }

    #[must_use]
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<u64> {
        self.values
    }

    fn cell(&self, from: usize, to: usize) -> Option<usize> {
        (from < self.size && to < self.size).then_some(from * self.size + to)
    }
}

/// Directed links between ports, as `(from, to)` positions in `ports`.
///
/// Port `from` must be healthy and claim `to` as its remote end.  Links come out ordered by
/// `from`, then by `to`.
#[must_use]
pub fn links(ports: &[Port]) -> Vec<(usize, usize)> {
    let mut by_id: HashMap<FabricPortId, Vec<usize>> = HashMap::with_capacity(ports.len());
    for (index, port) in ports.iter().enumerate() {
        by_id.entry(port.properties.port_id).or_default().push(index);
    }
    ports
        .iter()
        .enumerate()
        .filter(|(_, port)| port.state.status.is_healthy())
        .flat_map(|(from, port)| {
            by_id
                .get(&port.state.remote_port_id)
                .into_iter()
                .flatten()
                .copied()
                .filter(move |&to| to != from)
                .map(move |to| (from, to))
        })
        .collect()
}

/// Sum the bandwidth of every matched link.
///
/// Returns `None` when no link was matched (or the matrix could not be allocated), in which case
/// nothing should be published.
#[must_use]
pub fn build(
    registry: &Registry,
    ports: &PortList,
    topology: &Topology,
    config: &DiscoveryConfig,
) -> Option<BandwidthMatrix> {
    if ports.is_empty() {
        return None;
    }
    let mut matrix = match BandwidthMatrix::zeroed(registry.len()) {
        Ok(matrix) => matrix,
        Err(error) => {
            diagnostic!(config, "{error}");
            return None;
        }
    };

    let mut matched = 0usize;
    for (i, j) in links(ports.ports()) {
        let (from, to) = (&ports[i], &ports[j]);
        let bandwidth = from.state.rx_speed.megabytes();
        debug!(
            "found link model {} with {} bit/s from port #{i} ({}) to port #{j} ({})",
            to.properties.model, from.state.rx_speed.bit_rate, from.owner, to.owner
        );
        if to.properties.model != config.link_model() {
            continue;
        }
        let (Some(row), Some(column)) = (registry.find(from.owner), registry.find(to.owner)) else {
            continue;
        };
        matrix.add(row, column, bandwidth);
        if let (Some(from_root), Some(to_root)) = (from.root, to.root) {
            let (Some(row), Some(column)) = (registry.find(from_root), registry.find(to_root))
            else {
                continue;
            };
            matrix.add(row, column, bandwidth);
        }
        matched += 1;
    }
    if matched == 0 {
        debug!("no {} link between registered devices", config.link_model());
        return None;
    }

    fill_local(&mut matrix, registry, topology, config.local_bandwidth());
    Some(matrix)
}

/// Set the square block of every root device and its subdevices to `local`.
fn fill_local(matrix: &mut BandwidthMatrix, registry: &Registry, topology: &Topology, local: u64) {
    let nodes = registry.nodes();
    let mut start = 0;
    while start < nodes.len() {
        let subdevices = topology
            .info(nodes[start], keys::SUBDEVICES)
            .and_then(|count| count.parse::<usize>().ok())
            .unwrap_or(0);
        let end = start.saturating_add(subdevices).saturating_add(1).min(nodes.len());
        for row in start..end {
            for column in start..end {
                matrix.set(row, column, local);
            }
        }
        start = end;
    }
}

/// Step of [`publish`] which failed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display)]
pub enum PublishStage {
    Create,
    Attach,
    Commit,
}

/// What became of the bandwidth matrix.
#[derive(Debug, Default)]
pub enum Publication {
    /// There was nothing to publish.
    #[default]
    Nothing,
    /// The sink owns the matrix.
    Published { name: String, size: usize },
    /// The sink refused the matrix.
    Failed {
        stage: PublishStage,
        error: DistancesError,
        /// Handed back when the sink never took the values.
        matrix: Option<BandwidthMatrix>,
    },
}

impl Publication {
    #[must_use]
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

/// Hand `matrix` over to `sink` as the distances between the registered nodes.
///
/// The matrix is committed without grouping.
pub fn publish<S: DistancesSink>(
    sink: &mut S,
    registry: &Registry,
    matrix: BandwidthMatrix,
    config: &DiscoveryConfig,
) -> Publication {
    let name = config.distances_name();
    let kind = DistancesKind::FROM_OS | DistancesKind::MEANS_BANDWIDTH;
    let mut pending = match sink.create(name, kind) {
        Ok(pending) => pending,
        Err(error) => {
            debug!("failed to create distances {name}: {error}");
            return Publication::Failed {
                stage: PublishStage::Create,
                error,
                matrix: Some(matrix),
            };
        }
    };
    let size = matrix.size();
    if let Err(error) = sink.attach(&mut pending, registry.nodes().to_vec(), matrix.into_values()) {
        debug!("failed to attach values to distances {name}: {error}");
        return Publication::Failed {
            stage: PublishStage::Attach,
            error,
            matrix: None,
        };
    }
    if let Err(error) = sink.commit(pending, DistancesAddFlags::empty()) {
        debug!("failed to commit distances {name}: {error}");
        return Publication::Failed {
            stage: PublishStage::Commit,
            error,
            matrix: None,
        };
    }
    debug!("published {size}x{size} distances {name}");
    Publication::Published {
        name: name.to_string(),
        size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoveryConfigBuilder;
    use crate::ze::types::{
        FabricPortProperties, FabricPortSpeed, FabricPortState, FabricPortStatus,
    };
    use bolero::{Driver, ValueGenerator};
    use hardware::topology::{NodeId, ObjectType};
    use pretty_assertions::assert_eq;
    use std::ops::Bound;

    const LOCAL: u64 = 1_000_000;

    struct System {
        topology: Topology,
        registry: Registry,
        roots: Vec<NodeId>,
        subdevices: Vec<Vec<NodeId>>,
    }

    /// One root per entry of `shape`, with that many subdevices, registered in blocks.
    fn system(shape: &[usize]) -> System {
        let mut topology = Topology::new();
        let mut registry = Registry::new();
        let mut roots = Vec::new();
        let mut subdevices = Vec::new();
        for &count in shape {
            let root = topology.alloc(ObjectType::OsDevice, None);
            topology.insert_by_parent(topology.root(), root).unwrap();
            let subs: Vec<_> = (0..count)
                .map(|_| {
                    let sub = topology.alloc(ObjectType::OsDevice, None);
                    topology.insert_by_parent(root, sub).unwrap();
                    sub
                })
                .collect();
            if count > 0 {
                topology
                    .add_info(root, keys::SUBDEVICES, count.to_string())
                    .unwrap();
            }
            registry.add_block(root, &subs).unwrap();
            roots.push(root);
            subdevices.push(subs);
        }
        System {
            topology,
            registry,
            roots,
            subdevices,
        }
    }

    fn id(attach: u32, port: u8) -> FabricPortId {
        FabricPortId::new(0, attach, port)
    }

    fn port(
        owner: NodeId,
        root: Option<NodeId>,
        own: FabricPortId,
        remote: FabricPortId,
        status: FabricPortStatus,
        bit_rate: i64,
    ) -> Port {
        let speed = FabricPortSpeed { bit_rate, width: 4 };
        Port {
            owner,
            root,
            properties: FabricPortProperties {
                model: "XeLink".to_string(),
                on_subdevice: root.is_some(),
                subdevice_id: 0,
                port_id: own,
            },
            state: FabricPortState {
                status,
                remote_port_id: remote,
                rx_speed: speed,
                tx_speed: speed,
            },
        }
    }

    fn healthy(
        owner: NodeId,
        root: Option<NodeId>,
        own: FabricPortId,
        remote: FabricPortId,
        bit_rate: i64,
    ) -> Port {
        port(owner, root, own, remote, FabricPortStatus::Healthy, bit_rate)
    }

    fn list(ports: Vec<Port>) -> PortList {
        let mut list = PortList::new();
        for port in ports {
            list.push(port);
        }
        list
    }

    #[test]
    fn bandwidth_is_reported_in_megabytes() {
        let s = system(&[0, 0]);
        let (a, b) = (s.roots[0], s.roots[1]);
        let ports = list(vec![
            healthy(a, None, id(0, 1), id(1, 1), 2_097_152),
            healthy(b, None, id(1, 1), id(0, 1), 2_097_152),
        ]);
        let matrix = build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap();
        assert_eq!(matrix.values(), &[LOCAL, 2, 2, LOCAL]);
    }

    #[test]
    fn degraded_ports_only_receive() {
        let s = system(&[0, 0]);
        let (a, b) = (s.roots[0], s.roots[1]);
        let ports = list(vec![
            healthy(a, None, id(0, 1), id(1, 1), 2_097_152),
            port(
                b,
                None,
                id(1, 1),
                id(0, 1),
                FabricPortStatus::Degraded,
                2_097_152,
            ),
        ]);
        let matrix = build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap();
        assert_eq!(matrix.get(0, 1), Some(2));
        assert_eq!(matrix.get(1, 0), Some(0));
    }

    #[test]
    fn no_match_builds_nothing() {
        let s = system(&[0, 0]);
        let (a, b) = (s.roots[0], s.roots[1]);
        // both ports claim a peer which was never discovered
        let ports = list(vec![
            healthy(a, None, id(0, 1), id(7, 7), 1 << 30),
            healthy(b, None, id(1, 1), id(8, 8), 1 << 30),
        ]);
        assert_eq!(
            build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()),
            None
        );
        assert_eq!(
            build(&s.registry, &PortList::new(), &s.topology, &DiscoveryConfig::default()),
            None
        );
    }

    #[test]
    fn dangling_ports_contribute_nothing() {
        let s = system(&[0, 0, 0]);
        let (a, b, c) = (s.roots[0], s.roots[1], s.roots[2]);
        let ports = list(vec![
            healthy(a, None, id(0, 1), id(1, 1), 3 << 20),
            healthy(b, None, id(1, 1), id(0, 1), 3 << 20),
            healthy(c, None, id(2, 1), id(9, 9), 3 << 20),
        ]);
        let matrix = build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap();
        assert_eq!(
            matrix.values(),
            &[LOCAL, 3, 0, 3, LOCAL, 0, 0, 0, LOCAL]
        );
    }

    #[test]
    fn other_link_models_are_ignored() {
        let s = system(&[0, 0]);
        let (a, b) = (s.roots[0], s.roots[1]);
        let mut other = healthy(b, None, id(1, 1), id(0, 1), 1 << 30);
        other.properties.model = "xelink".to_string();
        let ports = list(vec![healthy(a, None, id(0, 1), id(1, 1), 1 << 30), other]);
        // a -> b lands on a port of the wrong model, b -> a is matched
        let matrix = build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap();
        assert_eq!(matrix.get(0, 1), Some(0));
        assert_eq!(matrix.get(1, 0), Some(1024));

        let config = DiscoveryConfigBuilder::default()
            .link_model("MDFI")
            .build()
            .unwrap();
        assert_eq!(build(&s.registry, &ports, &s.topology, &config), None);
    }

    #[test]
    fn unregistered_owners_are_skipped() {
        let mut s = system(&[0]);
        let stranger = s.topology.alloc(ObjectType::OsDevice, None);
        let a = s.roots[0];
        let ports = list(vec![
            healthy(a, None, id(0, 1), id(1, 1), 1 << 30),
            healthy(stranger, None, id(1, 1), id(0, 1), 1 << 30),
        ]);
        assert_eq!(
            build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()),
            None
        );
    }

    #[test]
    fn local_block_overrides_links_inside_a_device() {
        let s = system(&[2, 0]);
        let root = s.roots[0];
        let (s0, s1) = (s.subdevices[0][0], s.subdevices[0][1]);
        let peer = s.roots[1];
        let ports = list(vec![
            // subdevice to subdevice within the same device
            healthy(s0, Some(root), id(0, 1), id(0, 2), 5 << 20),
            healthy(s1, Some(root), id(0, 2), id(0, 1), 5 << 20),
            // subdevice to another device
            healthy(s0, Some(root), id(0, 3), id(1, 1), 7 << 20),
            healthy(peer, None, id(1, 1), id(0, 3), 7 << 20),
        ]);
        let matrix = build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap();
        for row in 0..3 {
            for column in 0..3 {
                assert_eq!(matrix.get(row, column), Some(LOCAL), "[{row}][{column}]");
            }
        }
        assert_eq!(matrix.get(1, 3), Some(7));
        assert_eq!(matrix.get(3, 1), Some(7));
        // only one end is a subdevice, nothing is rolled up
        assert_eq!(matrix.get(0, 3), Some(0));
        assert_eq!(matrix.get(3, 3), Some(LOCAL));
    }

    #[test]
    fn root_links_add_to_subdevice_rollup() {
        let s = system(&[1, 1]);
        let (r0, r1) = (s.roots[0], s.roots[1]);
        let (s0, s1) = (s.subdevices[0][0], s.subdevices[1][0]);
        let ports = list(vec![
            healthy(r0, None, id(0, 1), id(1, 1), 2 << 20),
            healthy(r1, None, id(1, 1), id(0, 1), 2 << 20),
            healthy(s0, Some(r0), id(0, 2), id(1, 2), 3 << 20),
            healthy(s1, Some(r1), id(1, 2), id(0, 2), 3 << 20),
        ]);
        let matrix = build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap();
        // root to root holds the direct link plus the subdevice link
        assert_eq!(matrix.get(0, 2), Some(5));
        assert_eq!(matrix.get(2, 0), Some(5));
        assert_eq!(matrix.get(1, 3), Some(3));
        assert_eq!(matrix.get(3, 1), Some(3));
    }

    #[test]
    fn block_is_clamped_to_the_registry() {
        let mut s = system(&[0]);
        let (a, b) = (s.roots[0], s.topology.alloc(ObjectType::OsDevice, None));
        s.topology.insert_by_parent(a, b).unwrap();
        s.registry.add(b).unwrap();
        // claims more subdevices than were registered
        s.topology.add_info(a, keys::SUBDEVICES, "4").unwrap();
        let ports = list(vec![
            healthy(a, None, id(0, 1), id(1, 1), 1 << 20),
            healthy(b, None, id(1, 1), id(0, 1), 1 << 20),
        ]);
        let matrix = build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap();
        assert_eq!(matrix.values(), &[LOCAL; 4]);
    }

    #[test]
    fn huge_subdevice_count_is_clamped() {
        let mut s = system(&[1, 0]);
        let (a, b) = (s.roots[0], s.roots[1]);
        s.topology
            .add_info(a, keys::SUBDEVICES, usize::MAX.to_string())
            .unwrap();
        let ports = list(vec![
            healthy(a, None, id(0, 1), id(2, 1), 1 << 20),
            healthy(b, None, id(2, 1), id(0, 1), 1 << 20),
        ]);
        let matrix = build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap();
        assert_eq!(matrix.values(), &[LOCAL; 9]);
    }

    struct PortsGenerator;

    impl ValueGenerator for PortsGenerator {
        type Output = Vec<(FabricPortId, FabricPortId, bool)>;

        fn generate<D: Driver>(&self, d: &mut D) -> Option<Self::Output> {
            let count = d.gen_usize(Bound::Included(&0), Bound::Included(&12))?;
            let mut ports = Vec::with_capacity(count);
            for _ in 0..count {
                // a small identity space so that links and shared identities are common
                let own = FabricPortId::new(
                    0,
                    d.gen_u32(Bound::Included(&0), Bound::Included(&2))?,
                    d.gen_u8(Bound::Included(&0), Bound::Included(&2))?,
                );
                let remote = FabricPortId::new(
                    0,
                    d.gen_u32(Bound::Included(&0), Bound::Included(&2))?,
                    d.gen_u8(Bound::Included(&0), Bound::Included(&2))?,
                );
                ports.push((own, remote, d.gen_bool(None)?));
            }
            Some(ports)
        }
    }

    #[test]
    fn links_match_the_quadratic_scan() {
        let mut topology = Topology::new();
        let owner = topology.alloc(ObjectType::OsDevice, None);
        bolero::check!()
            .with_generator(PortsGenerator)
            .for_each(|generated| {
                let ports: Vec<_> = generated
                    .iter()
                    .map(|&(own, remote, is_healthy)| {
                        let status = if is_healthy {
                            FabricPortStatus::Healthy
                        } else {
                            FabricPortStatus::Degraded
                        };
                        port(owner, None, own, remote, status, 1 << 20)
                    })
                    .collect();
                let mut expected = Vec::new();
                for (i, from) in ports.iter().enumerate() {
                    if from.state.status != FabricPortStatus::Healthy {
                        continue;
                    }
                    for (j, to) in ports.iter().enumerate() {
                        if i != j && from.state.remote_port_id == to.properties.port_id {
                            expected.push((i, j));
                        }
                    }
                }
                assert_eq!(links(&ports), expected);
            });
    }

    #[derive(Default)]
    struct RecordingSink {
        fail: Option<PublishStage>,
        calls: Vec<PublishStage>,
        committed: Option<(String, Vec<NodeId>, Vec<u64>)>,
    }

    impl RecordingSink {
        fn step(&mut self, stage: PublishStage) -> Result<(), DistancesError> {
            self.calls.push(stage);
            if self.fail == Some(stage) {
                return Err(DistancesError::NotAttached("refused".to_string()));
            }
            Ok(())
        }
    }

    impl DistancesSink for RecordingSink {
        type Pending = (String, Option<(Vec<NodeId>, Vec<u64>)>);

        fn create(
            &mut self,
            name: &str,
            kind: DistancesKind,
        ) -> Result<Self::Pending, DistancesError> {
            assert_eq!(kind, DistancesKind::FROM_OS | DistancesKind::MEANS_BANDWIDTH);
            self.step(PublishStage::Create)?;
            Ok((name.to_string(), None))
        }

        fn attach(
            &mut self,
            pending: &mut Self::Pending,
            objects: Vec<NodeId>,
            values: Vec<u64>,
        ) -> Result<(), DistancesError> {
            self.step(PublishStage::Attach)?;
            pending.1 = Some((objects, values));
            Ok(())
        }

        fn commit(
            &mut self,
            pending: Self::Pending,
            flags: DistancesAddFlags,
        ) -> Result<(), DistancesError> {
            assert_eq!(flags, DistancesAddFlags::empty());
            self.step(PublishStage::Commit)?;
            let (name, Some((objects, values))) = pending else {
                panic!("commit before attach");
            };
            self.committed = Some((name, objects, values));
            Ok(())
        }
    }

    fn matrix_for(s: &System) -> BandwidthMatrix {
        let (a, b) = (s.roots[0], s.roots[1]);
        let ports = list(vec![
            healthy(a, None, id(0, 1), id(1, 1), 1 << 20),
            healthy(b, None, id(1, 1), id(0, 1), 1 << 20),
        ]);
        build(&s.registry, &ports, &s.topology, &DiscoveryConfig::default()).unwrap()
    }

    #[test]
    fn publish_hands_everything_to_the_sink() {
        let s = system(&[0, 0]);
        let mut sink = RecordingSink::default();
        let publication = publish(&mut sink, &s.registry, matrix_for(&s), &DiscoveryConfig::default());
        assert!(publication.is_published());
        assert_eq!(
            sink.calls,
            vec![PublishStage::Create, PublishStage::Attach, PublishStage::Commit]
        );
        let (name, objects, values) = sink.committed.unwrap();
        assert_eq!(name, "XeLinkBandwidth");
        assert_eq!(objects, s.roots);
        assert_eq!(values, vec![LOCAL, 1, 1, LOCAL]);
    }

    #[test]
    fn create_failure_hands_the_matrix_back() {
        let s = system(&[0, 0]);
        let matrix = matrix_for(&s);
        let mut sink = RecordingSink {
            fail: Some(PublishStage::Create),
            ..RecordingSink::default()
        };
        match publish(&mut sink, &s.registry, matrix.clone(), &DiscoveryConfig::default()) {
            Publication::Failed {
                stage: PublishStage::Create,
                matrix: Some(back),
                ..
            } => assert_eq!(back, matrix),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(sink.calls, vec![PublishStage::Create]);
    }

    #[test]
    fn later_failures_stop_the_publication() {
        for stage in [PublishStage::Attach, PublishStage::Commit] {
            let s = system(&[0, 0]);
            let mut sink = RecordingSink {
                fail: Some(stage),
                ..RecordingSink::default()
            };
            match publish(&mut sink, &s.registry, matrix_for(&s), &DiscoveryConfig::default()) {
                Publication::Failed {
                    stage: failed,
                    matrix: None,
                    ..
                } => assert_eq!(failed, stage),
                other => panic!("unexpected {other:?}"),
            }
            assert!(sink.committed.is_none());
        }
    }

    #[test]
    fn publish_into_a_topology() {
        let mut s = system(&[0, 0]);
        let matrix = matrix_for(&s);
        let publication = publish(&mut s.topology, &s.registry, matrix, &DiscoveryConfig::default());
        assert!(publication.is_published());
        let distances = s.topology.distances_by_name("XeLinkBandwidth").unwrap();
        assert_eq!(distances.value(s.roots[0], s.roots[1]), Some(1));
        assert_eq!(distances.value(s.roots[1], s.roots[1]), Some(LOCAL));
    }
}
