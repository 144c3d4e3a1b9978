use super::*;
use proptest::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Attached(&'static str, usize),
    Destroyed(&'static str),
    Spacers(usize, usize),
    Subscribed,
    Unsubscribed,
}

type Journal = Arc<Mutex<Vec<Event>>>;

fn events(journal: &Journal) -> MutexGuard<'_, Vec<Event>> {
    journal.lock().unwrap()
}

struct TestHandle {
    name: &'static str,
    extent: Option<usize>,
    journal: Journal,
}

impl ItemHandle for TestHandle {
    fn measured_extent(&self) -> Option<usize> {
        self.extent
    }

    fn attach(&mut self, index: usize) {
        events(&self.journal)
            .push(Event::Attached(self.name, index));
    }

    fn destroy(self) {
        events(&self.journal).push(Event::Destroyed(self.name));
    }
}

struct TestHost {
    offset: usize,
    height: usize,
    journal: Journal,
}

impl ViewportHost for TestHost {
    fn scroll_offset(&self) -> usize {
        self.offset
    }

    fn viewport_height(&self) -> usize {
        self.height
    }

    fn subscribe(&mut self) {
        events(&self.journal).push(Event::Subscribed);
    }

    fn unsubscribe(&mut self) {
        events(&self.journal).push(Event::Unsubscribed);
    }

    fn layout_spacers(&mut self, top: &Spacer, bottom: &Spacer) {
        events(&self.journal)
            .push(Event::Spacers(top.height, bottom.height));
    }
}

type TestList = WindowedList<&'static str, TestHandle, TestHost>;

/// List whose handles all measure `extent`.
fn list_with(offset: usize, height: usize, base: usize, extent: usize) -> (TestList, Journal) {
    let journal: Journal = Arc::default();
    let host = TestHost {
        offset,
        height,
        journal: journal.clone(),
    };
    let handles = journal.clone();
    let list = WindowedList::new(
        Config::default().with_base_item_height(base),
        host,
        move |name: &&'static str, _index| {
            Ok(TestHandle {
                name: *name,
                extent: Some(extent),
                journal: handles.clone(),
            })
        },
    );
    (list, journal)
}

fn names(list: &TestList) -> Vec<&'static str> {
    list.iter().copied().collect()
}

fn materialized_names(list: &TestList) -> Vec<&'static str> {
    list.materialized().map(|(_, handle)| handle.name).collect()
}

fn destroyed(journal: &Journal) -> Vec<&'static str> {
    events(journal)
        .iter()
        .filter_map(|event| match event {
            Event::Destroyed(name) => Some(*name),
            _ => None,
        })
        .collect()
}

fn leak_names(count: usize) -> Vec<&'static str> {
    (0..count)
        .map(|i| &*Box::leak(format!("item-{i}").into_boxed_str()))
        .collect()
}

#[test]
fn test_new_subscribes_and_is_uninitialized() {
    let (list, journal) = list_with(0, 100, 20, 20);
    assert_eq!(*events(&journal), vec![Event::Subscribed]);
    assert!(!list.is_initialized());
    assert!(list.is_empty());
    assert_eq!(list.visible_range(), None);
}

#[test]
fn test_thousand_items_scrolled_to_500() {
    let (mut list, _) = list_with(500, 100, 20, 20);
    list.init(leak_names(1000)).unwrap();

    // Items touching either band edge are included.
    assert_eq!(list.visible_range(), Some(24..=30));
    let indices: Vec<usize> = list.materialized().map(|(i, _)| i).collect();
    assert_eq!(indices, (24..=30).collect::<Vec<_>>());

    let materialized: usize = 7 * 20;
    assert_eq!(list.top_spacer().height, 480);
    assert_eq!(
        list.bottom_spacer().height,
        1000 * 20 - 480 - materialized
    );
    assert_eq!(list.total_height(), 20_000);
}

#[test]
fn test_init_empty_list() {
    let (mut list, journal) = list_with(0, 100, 20, 20);
    list.init(Vec::new()).unwrap();

    assert!(list.is_initialized());
    assert_eq!(list.visible_range(), None);
    assert_eq!(list.materialized().count(), 0);
    assert_eq!(list.top_spacer().height, 0);
    assert_eq!(list.bottom_spacer().height, 0);
    assert_eq!(events(&journal).last(), Some(&Event::Spacers(0, 0)));
}

#[test]
fn test_measured_height_replaces_estimate() {
    let (mut list, _) = list_with(0, 10, 1, 3);
    list.init(vec!["a", "b", "c", "d", "e", "f"]).unwrap();

    // 0..3, 3..6, 6..9, 9..12 touch [0, 10]; e starts at 12.
    assert_eq!(materialized_names(&list), vec!["a", "b", "c", "d"]);
    assert_eq!(list.height_of(0), Some(3));
    assert_eq!(list.height_of(4), Some(1));
    assert_eq!(list.bottom_spacer().height, 2);
}

#[test]
fn test_item_taller_than_viewport_is_materialized_whole() {
    let (mut list, _) = list_with(40, 10, 100, 100);
    list.init(vec!["huge", "after"]).unwrap();

    assert_eq!(list.visible_range(), Some(0..=0));
    assert_eq!(list.height_of(0), Some(100));
    assert_eq!(list.top_spacer().height, 0);
    assert_eq!(list.bottom_spacer().height, 100);
}

#[test]
fn test_scrolling_destroys_handles_that_leave_the_band() {
    let (mut list, journal) = list_with(0, 20, 10, 10);
    list.init(vec!["a", "b", "c", "d", "e", "f", "g"]).unwrap();
    assert_eq!(materialized_names(&list), vec!["a", "b", "c"]);

    list.host_mut().offset = 40;
    assert!(list.on_scroll().unwrap());
    assert_eq!(materialized_names(&list), vec!["d", "e", "f", "g"]);
    assert_eq!(destroyed(&journal), vec!["a", "b", "c"]);
    assert_eq!(list.top_spacer().height, 30);
    assert_eq!(list.bottom_spacer().height, 0);
}

#[test]
fn test_init_destroys_previous_handles() {
    let (mut list, journal) = list_with(0, 20, 10, 10);
    list.init(vec!["a", "b"]).unwrap();
    list.init(vec!["a", "b"]).unwrap();

    // Same keys, but every handle is rebuilt.
    assert_eq!(destroyed(&journal), vec!["a", "b"]);
    assert_eq!(materialized_names(&list), vec!["a", "b"]);
}

#[test]
fn test_refresh_twice_draws_at_most_once() {
    let (mut list, _) = list_with(0, 20, 10, 10);
    list.init(vec!["a", "b", "c"]).unwrap();
    let after_init = list.draws();

    let first = list.refresh().unwrap();
    let second = list.refresh().unwrap();
    assert!(!second);
    assert!(list.draws() - after_init <= 1);
    assert_eq!(list.draws(), after_init + u64::from(first));
}

#[test]
fn test_refresh_skips_without_viewport_height() {
    let (mut list, _) = list_with(0, 0, 10, 10);
    list.init(vec!["a", "b"]).unwrap();
    let draws = list.draws();

    list.host_mut().offset = 10;
    assert!(!list.refresh().unwrap());
    assert_eq!(list.draws(), draws);
}

#[test]
fn test_refresh_before_init_is_a_no_op() {
    let (mut list, _) = list_with(0, 20, 10, 10);
    assert!(!list.refresh().unwrap());
    assert_eq!(list.draws(), 0);
}

#[test]
fn test_mutation_before_init_fails_fast() {
    let (mut list, _) = list_with(0, 20, 10, 10);
    assert!(matches!(list.add("a", None), Err(Error::NotInitialized)));
    assert!(matches!(list.remove(&"a"), Err(Error::NotInitialized)));
    assert!(matches!(list.move_item(&"a", 0), Err(Error::NotInitialized)));
    assert!(list.is_empty());
}

#[test]
fn test_add_clamps_index() {
    let (mut list, _) = list_with(0, 100, 10, 10);
    list.init(vec!["a", "b"]).unwrap();

    list.add("c", None).unwrap();
    list.add("d", Some(99)).unwrap();
    list.add("first", Some(0)).unwrap();
    list.add("mid", Some(2)).unwrap();
    assert_eq!(names(&list), vec!["first", "a", "mid", "b", "c", "d"]);
    assert_eq!(
        materialized_names(&list),
        vec!["first", "a", "mid", "b", "c", "d"]
    );
}

#[test]
fn test_add_outside_band_is_not_materialized() {
    let (mut list, _) = list_with(0, 10, 10, 10);
    list.init(vec!["a", "b", "c"]).unwrap();
    list.add("tail", None).unwrap();

    assert_eq!(list.find_index(&"tail"), Some(3));
    assert!(!materialized_names(&list).contains(&"tail"));
    assert_eq!(list.bottom_spacer().height, 20);
}

#[test]
fn test_remove_destroys_handle() {
    let (mut list, journal) = list_with(0, 100, 10, 10);
    list.init(vec!["a", "b", "c"]).unwrap();

    assert!(list.remove(&"b").unwrap());
    assert_eq!(names(&list), vec!["a", "c"]);
    assert_eq!(destroyed(&journal), vec!["b"]);
    assert_eq!(materialized_names(&list), vec!["a", "c"]);
}

#[test]
fn test_remove_absent_key_changes_nothing() {
    let (mut list, journal) = list_with(0, 100, 10, 10);
    list.init(vec!["a", "b", "c"]).unwrap();
    let before = events(&journal).len();
    let draws = list.draws();

    assert!(!list.remove(&"x").unwrap());
    assert_eq!(names(&list), vec!["a", "b", "c"]);
    assert_eq!(materialized_names(&list), vec!["a", "b", "c"]);
    assert_eq!(events(&journal).len(), before);
    assert_eq!(list.draws(), draws);
}

#[test]
fn test_remove_only_first_duplicate() {
    let (mut list, _) = list_with(0, 100, 10, 10);
    list.init(vec!["a", "dup", "b", "dup"]).unwrap();

    assert!(list.remove(&"dup").unwrap());
    assert_eq!(names(&list), vec!["a", "b", "dup"]);
}

#[test]
fn test_move_backward() {
    let (mut list, _) = list_with(0, 100, 10, 10);
    list.init(vec!["A", "B", "C", "D"]).unwrap();

    assert!(list.move_item(&"D", 0).unwrap());
    assert_eq!(names(&list), vec!["D", "A", "B", "C"]);
}

#[test]
fn test_move_forward_decrements_target() {
    let (mut list, _) = list_with(0, 100, 10, 10);
    list.init(vec!["A", "B", "C", "D"]).unwrap();

    // Inserted before C, which sat at index 2 before the removal.
    list.move_item(&"A", 2).unwrap();
    assert_eq!(names(&list), vec!["B", "A", "C", "D"]);

    list.init(vec!["A", "B", "C", "D"]).unwrap();
    list.move_item(&"A", 3).unwrap();
    assert_eq!(names(&list), vec!["B", "C", "A", "D"]);
}

#[test]
fn test_move_past_end_appends() {
    let (mut list, _) = list_with(0, 100, 10, 10);
    list.init(vec!["A", "B", "C"]).unwrap();

    list.move_item(&"A", 42).unwrap();
    assert_eq!(names(&list), vec!["B", "C", "A"]);
}

#[test]
fn test_move_absent_key_is_ignored() {
    let (mut list, _) = list_with(0, 100, 10, 10);
    list.init(vec!["A", "B"]).unwrap();

    assert!(!list.move_item(&"Z", 0).unwrap());
    assert_eq!(names(&list), vec!["A", "B"]);
}

#[test]
fn test_move_redraws_even_with_same_length() {
    let (mut list, journal) = list_with(0, 100, 10, 10);
    list.init(vec!["A", "B", "C", "D"]).unwrap();
    list.refresh().unwrap();
    assert!(!list.refresh().unwrap());

    list.move_item(&"D", 0).unwrap();
    // The moved record was rebuilt and attached at its new position.
    assert_eq!(materialized_names(&list), vec!["D", "A", "B", "C"]);
    assert_eq!(destroyed(&journal), vec!["D"]);
    assert!(events(&journal).contains(&Event::Attached("D", 0)));
}

#[test]
fn test_second_pass_reattaches_in_order() {
    let (mut list, journal) = list_with(0, 100, 10, 10);
    list.init(vec!["a", "b", "c"]).unwrap();
    events(&journal).clear();

    list.add("z", Some(0)).unwrap();
    let attached: Vec<(&str, usize)> = events(&journal)
        .iter()
        .filter_map(|event| match event {
            Event::Attached(name, index) => Some((*name, *index)),
            _ => None,
        })
        .collect();
    // z is created (attach on creation), then the band is re-attached in order.
    assert_eq!(
        attached,
        vec![("z", 0), ("z", 0), ("a", 1), ("b", 2), ("c", 3)]
    );
    // Spacers are laid out after every attachment.
    assert!(matches!(events(&journal).last(), Some(Event::Spacers(0, 0))));
}

#[test]
fn test_factory_error_leaves_no_handle() {
    let journal: Journal = Arc::default();
    let host = TestHost {
        offset: 0,
        height: 100,
        journal: journal.clone(),
    };
    let handles = journal.clone();
    let mut list = WindowedList::new(
        Config::default().with_base_item_height(10),
        host,
        move |name: &&'static str, _| {
            if *name == "bad" {
                return Err("cannot render".into());
            }
            Ok(TestHandle {
                name: *name,
                extent: Some(10),
                journal: handles.clone(),
            })
        },
    );

    let err = list.init(vec!["a", "bad", "c"]).unwrap_err();
    assert!(matches!(err, Error::Factory { index: 1, .. }));
    assert_eq!(materialized_names(&list), vec!["a"]);
    assert!(list.is_initialized());

    // The next refresh retries rather than being skipped.
    assert!(list.refresh().is_err());
}

#[test]
fn test_failed_scroll_keeps_handles_inside_band() {
    let journal: Journal = Arc::default();
    let host = TestHost {
        offset: 0,
        height: 10,
        journal: journal.clone(),
    };
    let handles = journal.clone();
    let mut list = WindowedList::new(
        Config::default().with_base_item_height(10),
        host,
        move |name: &&'static str, _| {
            if *name == "bad" {
                return Err("cannot render".into());
            }
            Ok(TestHandle {
                name: *name,
                extent: Some(10),
                journal: handles.clone(),
            })
        },
    );
    list.init(vec!["a", "b", "c", "bad", "e", "f"]).unwrap();
    assert_eq!(list.visible_range(), Some(0..=1));
    assert_eq!(materialized_names(&list), vec!["a", "b"]);

    list.host_mut().offset = 30;
    let err = list.on_scroll().unwrap_err();
    assert!(matches!(err, Error::Factory { index: 3, .. }));

    // The band stops before the failing record and nothing outside it lives on.
    assert_eq!(list.visible_range(), Some(2..=2));
    assert_eq!(materialized_names(&list), vec!["c"]);
    assert_eq!(destroyed(&journal), vec!["a", "b"]);
    assert_eq!(list.top_spacer().height, 20);
    assert_eq!(list.bottom_spacer().height, 30);
    assert!(matches!(events(&journal).last(), Some(Event::Spacers(20, 30))));
}

#[test]
fn test_unmeasurable_handle_is_destroyed() {
    let journal: Journal = Arc::default();
    let host = TestHost {
        offset: 0,
        height: 100,
        journal: journal.clone(),
    };
    let handles = journal.clone();
    let mut list = WindowedList::new(Config::default(), host, move |name: &&'static str, _| {
        Ok(TestHandle {
            name: *name,
            extent: None,
            journal: handles.clone(),
        })
    });

    let err = list.init(vec!["ghost"]).unwrap_err();
    assert!(matches!(err, Error::Unmeasurable { index: 0 }));
    assert_eq!(list.materialized().count(), 0);
    assert_eq!(destroyed(&journal), vec!["ghost"]);
}

#[test]
fn test_rerender_recreates_visible_handles_and_keeps_heights() {
    let (mut list, journal) = list_with(0, 20, 5, 10);
    list.init(vec!["a", "b", "c", "d"]).unwrap();
    assert_eq!(list.visible_range(), Some(0..=2));
    let draws = list.draws();

    list.rerender().unwrap();
    assert_eq!(destroyed(&journal), vec!["a", "b", "c"]);
    assert_eq!(materialized_names(&list), vec!["a", "b", "c"]);
    assert_eq!(list.height_of(0), Some(10));
    assert_eq!(list.height_of(3), Some(5));
    assert_eq!(list.total_height(), 35);
    assert_eq!(list.draws(), draws + 1);
}

#[test]
fn test_rerender_before_init_is_a_no_op() {
    let (mut list, journal) = list_with(0, 20, 5, 10);
    list.rerender().unwrap();
    assert_eq!(list.draws(), 0);
    assert_eq!(events(&journal).as_slice(), &[Event::Subscribed]);
}

#[test]
fn test_calculate_size_picks_up_new_height() {
    let (mut list, _) = list_with(0, 20, 10, 10);
    list.init(vec!["a", "b", "c", "d", "e", "f"]).unwrap();
    list.refresh().unwrap();
    assert_eq!(list.visible_range(), Some(0..=2));

    list.host_mut().height = 40;
    // Offset and count are unchanged, but the band grows.
    assert!(list.calculate_size().unwrap());
    assert_eq!(list.viewport_height(), 40);
    assert_eq!(list.visible_range(), Some(0..=4));
}

#[test]
fn test_resize_is_debounced() {
    let (mut list, _) = list_with(0, 20, 10, 10);
    list.init(vec!["a", "b", "c", "d", "e", "f"]).unwrap();
    list.host_mut().height = 40;

    let _first = list.on_resize();
    let _second = list.on_resize();
    assert!(list.resize_pending());
    // Nothing is recomputed until the latest tick arrives.
    assert_eq!(list.viewport_height(), 20);

    let id = list.debounce_id();
    assert!(!list.handle_debounce(&DebounceMsg::new(id, 1)).unwrap());
    assert_eq!(list.viewport_height(), 20);
    assert!(list.handle_debounce(&DebounceMsg::new(id, 2)).unwrap());
    assert_eq!(list.viewport_height(), 40);
    assert!(!list.resize_pending());
}

#[test]
fn test_delete_unsubscribes_and_destroys_handles() {
    let (mut list, journal) = list_with(0, 20, 10, 10);
    list.init(vec!["a", "b", "c", "d", "e"]).unwrap();
    list.delete();

    let log = events(&journal);
    let unsubscribed = log
        .iter()
        .position(|e| *e == Event::Unsubscribed)
        .expect("unsubscribed");
    assert_eq!(
        log[unsubscribed + 1..].to_vec(),
        vec![
            Event::Destroyed("a"),
            Event::Destroyed("b"),
            Event::Destroyed("c")
        ]
    );
    assert_eq!(
        log.iter().filter(|e| **e == Event::Unsubscribed).count(),
        1
    );
}

#[test]
fn test_drop_tears_down() {
    let (mut list, journal) = list_with(0, 20, 10, 10);
    list.init(vec!["a"]).unwrap();
    drop(list);
    assert!(events(&journal).contains(&Event::Unsubscribed));
    assert_eq!(destroyed(&journal), vec!["a"]);
}

// Measured extents never undercut the estimate, which keeps the one-pass
// walk free of records that fall back above the band after a measurement.
fn heights_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(10usize..40, 0..120)
}

/// List whose handle for record `i` measures `extents[i]`.
fn measured_list(offset: usize, height: usize, base: usize, extents: Vec<usize>) -> TestList {
    let journal: Journal = Arc::default();
    let host = TestHost {
        offset,
        height,
        journal: journal.clone(),
    };
    let names = leak_names(extents.len());
    let lookup = names.clone();
    let mut list = WindowedList::new(
        Config::default().with_base_item_height(base),
        host,
        move |name: &&'static str, _| {
            let extent = lookup
                .iter()
                .position(|n| n == name)
                .and_then(|index| extents.get(index).copied())
                .unwrap_or(base);
            Ok(TestHandle {
                name: *name,
                extent: Some(extent),
                journal: journal.clone(),
            })
        },
    );
    list.init(names).unwrap();
    list
}

proptest! {
    #[test]
    fn prop_band_matches_intersection(
        count in 0usize..300,
        base in 1usize..30,
        offset in 0usize..6000,
        height in 1usize..400,
    ) {
        let (mut list, _) = list_with(offset, height, base, base);
        list.init(leak_names(count)).unwrap();

        let expected: Vec<usize> = (0..count)
            .filter(|i| {
                let top = i * base;
                top + base >= offset && top <= offset + height
            })
            .collect();
        let actual: Vec<usize> = list.materialized().map(|(i, _)| i).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_padding_is_conserved(
        extents in heights_strategy(),
        base in 1usize..10,
        offsets in prop::collection::vec(0usize..3000, 1..6),
        height in 1usize..200,
    ) {
        let mut list = measured_list(0, height, base, extents);
        for offset in offsets {
            list.host_mut().offset = offset;
            list.on_scroll().unwrap();

            let materialized: usize = list
                .materialized()
                .map(|(i, _)| list.height_of(i).unwrap_or(0))
                .sum();
            prop_assert_eq!(
                list.top_spacer().height + list.bottom_spacer().height + materialized,
                list.total_height()
            );
        }
    }

    #[test]
    fn prop_materialized_order_follows_table(
        extents in heights_strategy(),
        ops in prop::collection::vec((0u8..3, 0usize..150, 0usize..150), 0..20),
        offset in 0usize..2000,
    ) {
        let mut list = measured_list(offset, 60, 5, extents);
        let mut extra = 0usize;
        for (op, a, b) in ops {
            match op {
                0 => {
                    let name: &'static str = Box::leak(format!("extra-{extra}").into_boxed_str());
                    extra += 1;
                    // Extra items are not in the lookup and measure the base height.
                    list.add(name, Some(a)).unwrap();
                }
                1 => {
                    if let Some(key) = list.get(a % list.len().max(1)).copied() {
                        list.remove(&key).unwrap();
                    }
                }
                _ => {
                    if let Some(key) = list.get(a % list.len().max(1)).copied() {
                        list.move_item(&key, b).unwrap();
                    }
                }
            }

            let indices: Vec<usize> = list.materialized().map(|(i, _)| i).collect();
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            for (index, handle) in list.materialized() {
                prop_assert_eq!(list.get(index).copied(), Some(handle.name));
            }
        }
    }
}
