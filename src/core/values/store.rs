use crate::core::types::NetId;
use crate::core::values::net::{extract, insert, mask, Net};
use log::warn;

/// Part of a bit range that lives in one storage net
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Canonical storage net
    pub net: NetId,
    /// First bit inside `net`
    pub offset: u32,
    pub width: u32,
    /// First bit of this piece relative to the start of the range
    pub position: u32,
}

/// Arena of nets with union-find canonicalization
///
/// Every allocated net keeps its slot forever. Only nets of equal width are
/// ever unified. To share part of a net, the net is first split at the
/// boundaries of that part: it then holds no value of its own and delegates
/// its low and high bits to two child nets, which can be unified
/// independently. Values live in canonical nets that were never split.
#[derive(Debug, Default)]
pub struct ValueStore {
    nets: Vec<Net>,
    parent: Vec<usize>,
    /// Low and high halves of a split net
    halves: Vec<Option<(NetId, NetId)>>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new root net holding `value` (truncated to `width`)
    pub fn allocate(&mut self, width: u32, value: u64) -> NetId {
        let id = self.nets.len();
        self.nets.push(Net::with_value(width, value));
        self.parent.push(id);
        self.halves.push(None);
        NetId(id)
    }

    /// Number of nets ever allocated, absorbed and split ones included
    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    /// Number of canonical nets that hold a value
    pub fn root_count(&self) -> usize {
        (0..self.nets.len())
            .filter(|i| self.parent[*i] == *i && self.halves[*i].is_none())
            .count()
    }

    pub fn is_root(&self, id: NetId) -> bool {
        self.parent.get(id.0).map_or(false, |p| *p == id.0)
    }

    /// True if `id` resolves to a net that delegates to two halves
    pub fn is_split(&self, id: NetId) -> bool {
        self.halves[self.resolve(id).0].is_some()
    }

    /// Declared width of a net slot
    pub fn width(&self, id: NetId) -> u32 {
        self.nets[id.0].width
    }

    /// Walk to the root without compressing the path
    pub fn resolve(&self, id: NetId) -> NetId {
        let mut current = id.0;
        while self.parent[current] != current {
            current = self.parent[current];
        }
        NetId(current)
    }

    /// Walk to the root, pointing every visited net straight at it
    pub fn find(&mut self, id: NetId) -> NetId {
        let root = self.resolve(id);
        let mut current = id.0;
        while self.parent[current] != current {
            let next = self.parent[current];
            self.parent[current] = root.0;
            current = next;
        }
        root
    }

    /// Compress every path so later resolves are a single hop
    pub fn compress(&mut self) {
        for i in 0..self.nets.len() {
            self.find(NetId(i));
        }
    }

    /// Narrowest canonical net containing `[offset, offset + width)` of `id`
    ///
    /// Returns that net and the range's offset inside it.
    pub fn locate(&self, id: NetId, offset: u32, width: u32) -> (NetId, u32) {
        let mut net = self.resolve(id);
        let mut offset = offset;
        while let Some((low, high)) = self.halves[net.0] {
            let at = self.width(low);
            if offset + width <= at {
                net = self.resolve(low);
            } else if offset >= at {
                net = self.resolve(high);
                offset -= at;
            } else {
                break;
            }
        }
        (net, offset)
    }

    /// Storage nets covering `[offset, offset + width)` of `id`, low bits first
    pub fn pieces(&self, id: NetId, offset: u32, width: u32) -> Vec<Piece> {
        let mut pieces = Vec::new();
        self.collect(id, offset, width, 0, &mut pieces);
        pieces
    }

    fn collect(&self, id: NetId, offset: u32, width: u32, position: u32, out: &mut Vec<Piece>) {
        let net = self.resolve(id);
        match self.halves[net.0] {
            None => out.push(Piece {
                net,
                offset,
                width,
                position,
            }),
            Some((low, high)) => {
                let at = self.width(low);
                let end = offset + width;
                if offset < at {
                    self.collect(low, offset, end.min(at) - offset, position, out);
                }
                if end > at {
                    let start = offset.max(at);
                    self.collect(high, start - at, end - start, position + start - offset, out);
                }
            }
        }
    }

    /// Split the storage net containing bit `at` of `id` so that a net
    /// boundary falls on `at`
    ///
    /// Returns false if a boundary was already there.
    pub(crate) fn cut(&mut self, id: NetId, at: u32) -> bool {
        let net = self.find(id);
        if at == 0 || at >= self.width(net) {
            return false;
        }
        match self.halves[net.0] {
            Some((low, high)) => {
                let boundary = self.width(low);
                if at < boundary {
                    self.cut(low, at)
                } else if at > boundary {
                    self.cut(high, at - boundary)
                } else {
                    false
                }
            }
            None => {
                let (width, value) = (self.nets[net.0].width, self.nets[net.0].value);
                let low = self.allocate(at, extract(value, 0, at));
                let high = self.allocate(width - at, extract(value, at, width - at));
                self.halves[net.0] = Some((low, high));
                self.nets[net.0].value = 0;
                true
            }
        }
    }

    /// Make two equal-width ranges share storage bit for bit
    ///
    /// Both ranges are split until they are made of whole storage nets with
    /// matching boundaries, then those nets are unified pairwise. Bits
    /// outside the ranges keep their own storage. Returns the number of
    /// storage nets that were absorbed.
    pub(crate) fn join(
        &mut self,
        left: (NetId, u32),
        right: (NetId, u32),
        width: u32,
    ) -> usize {
        loop {
            let mut changed = false;
            for (net, offset) in [left, right] {
                changed |= self.cut(net, offset);
                changed |= self.cut(net, offset + width);
            }
            let mut boundaries: Vec<u32> = self
                .pieces(left.0, left.1, width)
                .into_iter()
                .chain(self.pieces(right.0, right.1, width))
                .map(|piece| piece.position)
                .collect();
            boundaries.sort_unstable();
            boundaries.dedup();
            for position in boundaries {
                for (net, offset) in [left, right] {
                    changed |= self.cut(net, offset + position);
                }
            }
            if !changed {
                break;
            }
        }

        let left_pieces = self.pieces(left.0, left.1, width);
        let right_pieces = self.pieces(right.0, right.1, width);
        debug_assert_eq!(left_pieces.len(), right_pieces.len());
        let mut absorbed = 0;
        for (l, r) in left_pieces.iter().zip(&right_pieces) {
            if self.union(l.net, r.net) {
                absorbed += 1;
            }
        }
        absorbed
    }

    /// Make the canonical net of `child` part of the one of `parent`
    ///
    /// Both must hold values and have the same width. The parent's value is
    /// kept unless it is zero; a non-zero child value (a constant,
    /// typically) then survives the merge.
    pub(crate) fn union(&mut self, child: NetId, parent: NetId) -> bool {
        let child = self.find(child);
        let parent = self.find(parent);
        if child == parent {
            return false;
        }
        debug_assert!(self.halves[child.0].is_none() && self.halves[parent.0].is_none());
        debug_assert_eq!(self.width(child), self.width(parent));

        let carried = self.nets[child.0].value;
        let existing = self.nets[parent.0].value;
        if existing == 0 {
            self.nets[parent.0].value = carried;
        } else if carried != 0 && carried != existing {
            warn!(
                "merging {} into {}: conflicting values {:#x} and {:#x}, keeping {:#x}",
                child, parent, carried, existing, existing
            );
        }
        self.parent[child.0] = parent.0;
        true
    }

    /// Read `width` bits at `offset` relative to net `id`
    pub fn read(&self, id: NetId, offset: u32, width: u32) -> u64 {
        self.pieces(id, offset, width)
            .into_iter()
            .fold(0, |value, piece| {
                let bits = extract(self.nets[piece.net.0].value, piece.offset, piece.width);
                value | (bits << piece.position)
            })
    }

    /// Masked write of `width` bits at `offset` relative to net `id`
    ///
    /// Returns every storage net touched with its new value.
    pub fn write(&mut self, id: NetId, offset: u32, width: u32, bits: u64) -> Vec<(NetId, u64)> {
        let bits = bits & mask(width);
        self.pieces(id, offset, width)
            .into_iter()
            .map(|piece| {
                let net = &mut self.nets[piece.net.0];
                let field = extract(bits, piece.position, piece.width);
                net.value = insert(net.value, piece.offset, piece.width, field) & mask(net.width);
                (piece.net, net.value)
            })
            .collect()
    }
}
