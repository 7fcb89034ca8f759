use crate::index::make_index;

make_index!(pub(crate) BucketIndex);

/// Maximum number of tie-breaking orders a [BucketList] tracks at once.
pub(crate) const MAX_ORDERS: usize = 2;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Gen(u32);

/// Links of a vertex inside the list of one tie-breaking order.
#[derive(Copy, Clone, Debug, Default)]
struct Link {
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Copy, Clone, Debug, Default)]
struct Ends {
    first: Option<usize>,
    last: Option<usize>,
}

#[derive(Clone, Debug)]
struct Bucket {
    prev: BucketIndex,
    next: BucketIndex,
    /// The vertices of the bucket, once per tie-breaking order, best first.
    lists: [Ends; MAX_ORDERS],
    len: u32,
    /// Bucket that received this bucket's neighbors during the refinement of generation
    /// `split_gen`.
    split: BucketIndex,
    split_gen: Gen,
}

impl Bucket {
    fn new() -> Self {
        Self {
            prev: BucketIndex::nil(),
            next: BucketIndex::nil(),
            lists: [Ends::default(); MAX_ORDERS],
            len: 0,
            split: BucketIndex::nil(),
            split_gen: Gen(0),
        }
    }
}

/// Ordered partition of the unvisited vertices of a lexicographic breadth-first search.
///
/// Buckets are kept in decreasing label order, the head bucket holds the vertices with the
/// lexicographically largest label. Inside a bucket the vertices are kept once for every
/// tie-breaking order, so the best candidate under each order is available in constant time.
#[derive(Debug)]
pub(crate) struct BucketList {
    buckets: Vec<Bucket>,
    removed: Vec<BucketIndex>,
    head: BucketIndex,
    bucket_of: Vec<BucketIndex>,
    links: Vec<[Link; MAX_ORDERS]>,
    orders: usize,
    gen: Gen,
}

impl BucketList {
    /// Creates a single bucket holding all vertices. `sequences[k]` lists every vertex, best
    /// first, for the `k`-th tie-breaking order.
    pub(crate) fn new(n: usize, sequences: &[&[usize]]) -> Self {
        let orders = sequences.len();
        assert!((1..=MAX_ORDERS).contains(&orders));
        debug_assert!(sequences.iter().all(|s| s.len() == n));

        let gen = Gen(0);
        let mut list = Self {
            buckets: Vec::with_capacity(n + 1),
            removed: vec![],
            head: BucketIndex::nil(),
            bucket_of: vec![BucketIndex::nil(); n],
            links: vec![[Link::default(); MAX_ORDERS]; n],
            orders,
            gen,
        };
        if n == 0 {
            return list;
        }
        let bucket = list.new_bucket();
        list.head = bucket;
        for (k, sequence) in sequences.iter().enumerate() {
            for &v in sequence.iter() {
                list.push_back(bucket, k, v);
            }
        }
        for v in 0..n {
            list.bucket_of[v] = bucket;
        }
        list.buckets[bucket.index()].len = n as u32;
        list
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_nil()
    }

    /// Best vertex of the head bucket under the `k`-th order.
    pub(crate) fn head_candidate(&self, k: usize) -> Option<usize> {
        if self.head.is_nil() {
            return None;
        }
        self.buckets[self.head.index()].lists[k].first
    }

    #[cfg(test)]
    pub(crate) fn is_visited(&self, v: usize) -> bool {
        self.bucket_of[v].is_nil()
    }

    /// Removes `v` from the partition.
    pub(crate) fn visit(&mut self, v: usize) {
        let bucket = self.unlink(v);
        self.bucket_of[v] = BucketIndex::nil();
        if self.buckets[bucket.index()].len == 0 {
            self.remove_bucket(bucket);
        }
    }

    /// Moves the unvisited vertices among `neighbors` out of their buckets into new buckets that
    /// are placed directly in front of the old ones.
    ///
    /// `neighbors[k]` are the neighbors of the visited vertex sorted best first under the `k`-th
    /// order. All slices contain the same vertices.
    pub(crate) fn refine(&mut self, neighbors: &[&[usize]]) {
        debug_assert_eq!(neighbors.len(), self.orders);
        self.gen.0 += 1;

        for &w in neighbors[0] {
            let bucket = self.bucket_of[w];
            if bucket.is_nil() {
                continue;
            }
            let split = if self.buckets[bucket.index()].split_gen == self.gen {
                self.buckets[bucket.index()].split
            } else {
                let split = self.new_bucket_before(bucket);
                let inner = &mut self.buckets[bucket.index()];
                inner.split = split;
                inner.split_gen = self.gen;
                split
            };

            self.unlink(w);
            self.push_back(split, 0, w);
            self.bucket_of[w] = split;
            self.buckets[split.index()].len += 1;
            if self.buckets[bucket.index()].len == 0 {
                self.remove_bucket(bucket);
            }
        }

        for (k, list) in neighbors.iter().enumerate().skip(1) {
            for &w in list.iter() {
                let bucket = self.bucket_of[w];
                if !bucket.is_nil() {
                    self.push_back(bucket, k, w);
                }
            }
        }
    }

    fn new_bucket(&mut self) -> BucketIndex {
        let bucket = Bucket::new();
        if let Some(idx) = self.removed.pop() {
            self.buckets[idx.index()] = bucket;
            idx
        } else {
            self.buckets.push(bucket);
            BucketIndex::new(self.buckets.len() - 1)
        }
    }

    fn new_bucket_before(&mut self, bucket: BucketIndex) -> BucketIndex {
        let new = self.new_bucket();
        let prev = self.buckets[bucket.index()].prev;
        self.buckets[new.index()].prev = prev;
        self.buckets[new.index()].next = bucket;
        if prev.is_nil() {
            self.head = new;
        } else {
            self.buckets[prev.index()].next = new;
        }
        self.buckets[bucket.index()].prev = new;
        new
    }

    fn remove_bucket(&mut self, bucket: BucketIndex) {
        let Bucket { prev, next, .. } = self.buckets[bucket.index()];
        if prev.is_nil() {
            self.head = next;
        } else {
            self.buckets[prev.index()].next = next;
        }
        if !next.is_nil() {
            self.buckets[next.index()].prev = prev;
        }
        self.removed.push(bucket);
    }

    fn push_back(&mut self, bucket: BucketIndex, k: usize, v: usize) {
        let ends = &mut self.buckets[bucket.index()].lists[k];
        let last = ends.last;
        ends.last = Some(v);
        if last.is_none() {
            ends.first = Some(v);
        }
        if let Some(last) = last {
            self.links[last][k].next = Some(v);
        }
        self.links[v][k] = Link { prev: last, next: None };
    }

    /// Takes `v` out of every list of its bucket and returns the bucket.
    fn unlink(&mut self, v: usize) -> BucketIndex {
        let bucket = self.bucket_of[v];
        for k in 0..self.orders {
            let Link { prev, next } = self.links[v][k];
            match prev {
                Some(p) => self.links[p][k].next = next,
                None => self.buckets[bucket.index()].lists[k].first = next,
            }
            match next {
                Some(x) => self.links[x][k].prev = prev,
                None => self.buckets[bucket.index()].lists[k].last = prev,
            }
            self.links[v][k] = Link::default();
        }
        self.buckets[bucket.index()].len -= 1;
        bucket
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn drain(list: &BucketList, k: usize) -> Vec<Vec<usize>> {
        let mut result = vec![];
        let mut bucket = list.head;
        while !bucket.is_nil() {
            let mut vertices = vec![];
            let mut v = list.buckets[bucket.index()].lists[k].first;
            while let Some(x) = v {
                vertices.push(x);
                v = list.links[x][k].next;
            }
            result.push(vertices);
            bucket = list.buckets[bucket.index()].next;
        }
        result
    }

    #[test]
    fn refine_places_neighbors_in_front() {
        let identity: Vec<usize> = (0..6).collect();
        let mut list = BucketList::new(6, &[&identity]);
        assert_eq!(drain(&list, 0), [vec![0, 1, 2, 3, 4, 5]]);

        list.visit(0);
        list.refine(&[&[2, 4]]);
        assert_eq!(drain(&list, 0), [vec![2, 4], vec![1, 3, 5]]);

        list.visit(2);
        list.refine(&[&[0, 1, 4, 5]]);
        assert_eq!(drain(&list, 0), [vec![4], vec![1, 5], vec![3]]);
        assert!(list.is_visited(0));
        assert!(!list.is_visited(5));
        assert_eq!(list.head_candidate(0), Some(4));
    }

    #[test]
    fn emptied_buckets_are_unlinked() {
        let identity: Vec<usize> = (0..3).collect();
        let mut list = BucketList::new(3, &[&identity]);
        list.visit(0);
        list.refine(&[&[1, 2]]);
        assert_eq!(drain(&list, 0), [vec![1, 2]]);
        list.visit(1);
        list.visit(2);
        assert!(list.is_empty());
        assert_eq!(list.head_candidate(0), None);
    }

    #[test]
    fn two_orders_stay_in_sync() {
        let forward: Vec<usize> = (0..5).collect();
        let backward: Vec<usize> = (0..5).rev().collect();
        let mut list = BucketList::new(5, &[&forward, &backward]);
        assert_eq!(list.head_candidate(0), Some(0));
        assert_eq!(list.head_candidate(1), Some(4));

        list.visit(2);
        list.refine(&[&[1, 3], &[3, 1]]);
        assert_eq!(drain(&list, 0), [vec![1, 3], vec![0, 4]]);
        assert_eq!(drain(&list, 1), [vec![3, 1], vec![4, 0]]);
        assert_eq!(list.head_candidate(0), Some(1));
        assert_eq!(list.head_candidate(1), Some(3));
    }
}
