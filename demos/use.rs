use avl_search_tree::{AvlTreeMap, AvlTreeSet, Error};

fn main() {
    env_logger::init();

    let mut map = AvlTreeMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "deux");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.find(&2), Ok(&"two"));
    *map.find_mut(&1).unwrap() = "uno";
    assert_eq!(map.find(&1), Ok(&"uno"));
    assert_eq!(map.find(&6), Err(Error::ElementNotFound));

    for (k, v) in &map {
        println!("{k} => {v}");
    }
    println!("pre-order: {:?}", map.pre_order());
    println!("post-order: {:?}", map.post_order());

    let mut set = AvlTreeSet::new();
    for x in 0..5 {
        set.insert(x);
    }
    assert!(set.contains(&1));
    assert!(!set.contains(&5));

    print!("{{ ");
    for x in &set {
        print!("{x}, ");
    }
    println!("}}");
}
