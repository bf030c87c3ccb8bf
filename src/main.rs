use bst_map::TreeMap;

fn print_pair(key: &String, value: &i32) {
    println!("  {} => {}", key, value);
}

fn main() -> bst_map::Result<()> {
    env_logger::init();

    let mut map = TreeMap::<String, i32>::builder()
        .natural_order()
        .release_keys(|key: String| log::trace!("released key {key}"))
        .release_values(|value: i32| log::trace!("released value {value}"))
        .build()?;

    let keys = ["delta", "alpha", "charlie", "bravo", "echo"];
    let values = [4, 1, 3, 2, 5];
    map.extend(keys.iter().map(|k| k.to_string()).zip(values));

    println!("BST Size: {}, Height: {}\n", map.size(), map.height());

    println!("In-order traversal (sorted):");
    map.traverse_inorder(print_pair);

    println!("\nPre-order traversal:");
    map.traverse_preorder(print_pair);

    println!("\nPost-order traversal:");
    map.traverse_postorder(print_pair);

    let show = |key: Option<&String>| key.map_or("(none)".to_string(), String::clone);
    println!("\n--- Search Operations ---");
    println!("Min key: {}", show(map.min_key()));
    println!("Max key: {}", show(map.max_key()));
    println!("Floor of 'delta': {}", show(map.floor_key("delta")));
    println!("Ceiling of 'bob': {}", show(map.ceiling_key("bob")));
    println!("Successor of 'bravo': {}", show(map.successor_key("bravo")));
    println!("Predecessor of 'alpha': {}", show(map.predecessor_key("alpha")));

    println!("\n--- Removal Test ---");
    println!("Removing key 'charlie'...");
    if map.remove("charlie") {
        println!("Successfully removed 'charlie'");
    }
    println!("In-order traversal after removal:");
    map.traverse_inorder(print_pair);

    println!("\n--- Final Statistics ---");
    println!("Final Size: {}, Height: {}", map.size(), map.height());

    drop(map);
    println!("\nBST demonstration complete.");
    Ok(())
}
