use std::fmt::Debug;

use regex::Regex;

pub fn assert_re(pattern: &str, haystack: &str) {
    let re = Regex::new(pattern).unwrap();
    assert!(re.is_match(haystack), "{:?} did not match {:?}", haystack, re);
}

pub fn assert_big_struct_eq<T: PartialEq + Debug>(left: T, right: T) {
    assert_eq!(left, right, "{:#?} != {:#?}", left, right);
}

pub fn assert_vec_eq<T: PartialEq + Debug>(left: Vec<T>, right: Vec<T>) {
    assert_slice_eq(&left, &right);
}

/// Like assert_eq, but prints one element per line, and then which indices
/// differ, which is far easier to read for long lists (eg. lines of output).
pub fn assert_slice_eq<T: PartialEq + Debug>(left: &[T], right: &[T]) {
    if left == right {
        return;
    }

    let dump = |v: &[T]| v.iter().map(|o| format!("{:?},\n", o)).collect::<String>();
    eprintln!("left != right. left: [\n{}] != right: [\n{}]", dump(left), dump(right));

    if left.len() != right.len() {
        eprintln!("size of left ({}) != size of right ({})", left.len(), right.len());
    }
    for (i, (l, r)) in left.iter().zip(right).enumerate() {
        if l != r {
            eprintln!("Mismatch at index {}:", i);
            eprintln!("left: {:#?} != right: {:#?}", l, r);
        }
    }
    panic!("left != right");
}
