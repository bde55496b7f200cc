use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use smallany::features::{
    Streamable, Streamed, StrictAdd, StrictEq, StrictHash, StrictInplace, StrictLess,
    StrictStreamed,
};
use smallany::variant::Variant;
use smallany::{Error, SmallAny};

type Ordered = SmallAny<16, StrictLess<StrictEq>>;
type Key = SmallAny<16, StrictEq<StrictHash>>;
type Summable = SmallAny<16, StrictAdd>;

smallany::variant_set!(Scalars = i32, i64, String);

#[test]
fn test_less() {
    let a = Ordered::new(3);
    let b = Ordered::new(10);
    assert!(a < b);
    assert!(b > a);
    assert!(a <= a.clone());
    assert_eq!(a.try_lt(&b), Ok(true));
    assert_eq!(b.try_cmp(&a), Ok(Some(Ordering::Greater)));

    let nan = Ordered::new(f64::NAN);
    assert_eq!(nan.try_cmp(&nan), Ok(None));

    let words = SmallAny::<32, StrictLess<StrictEq>>::new(String::from("apple"));
    assert!(words < SmallAny::new(String::from("banana")));
}

#[test]
fn test_less_across_types_fails() {
    let a = Ordered::new(1i32);
    let b = Ordered::new(1i64);
    assert_eq!(
        a.try_lt(&b),
        Err(Error::TypeMismatch {
            op: "<",
            lhs: "i32",
            rhs: "i64"
        })
    );
    assert_eq!(a.try_cmp(&Ordered::empty()), Err(Error::Empty { op: "<" }));

    let panicked = catch_unwind(AssertUnwindSafe(|| a < b));
    assert!(panicked.is_err());
}

#[test]
fn test_eq() {
    let a = Key::new(5u16);
    assert!(a == Key::new(5u16));
    assert!(a != Key::new(6u16));
    assert_eq!(
        a.try_eq(&Key::new(5u32)).unwrap_err().to_string(),
        "operator `==` applied to different types: `u16` and `u32`"
    );
    assert_eq!(Key::empty().try_eq(&a), Err(Error::Empty { op: "==" }));
}

#[test]
#[should_panic(expected = "different types")]
fn test_eq_across_types_panics() {
    let _ = Key::new(1u8) == Key::new('1');
}

#[test]
fn test_hash() {
    let a = Key::new(String::from("key"));
    let b = Key::new(String::from("key"));
    assert_eq!(a.try_hash(), b.try_hash());
    assert_ne!(a.try_hash(), Key::new(String::from("other")).try_hash());
    assert_eq!(Key::empty().try_hash(), Err(Error::Empty { op: "hash" }));

    let mut map = HashMap::new();
    for i in 0..100u32 {
        map.insert(Key::new(i), i * 2);
    }
    assert_eq!(map.len(), 100);
    assert_eq!(map.get(&Key::new(21u32)), Some(&42));
    assert_eq!(map.insert(Key::new(21u32), 0), Some(42));
    assert_eq!(map.len(), 100);
}

#[test]
fn test_sort() {
    let mut words: Vec<SmallAny<32, StrictLess<StrictEq>>> =
        ["pear", "fig", "plum"].into_iter().map(SmallAny::from).collect();
    words.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let words = words
        .iter()
        .map(|w| w.cast_ref::<String>().cloned())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(words, ["fig", "pear", "plum"]);
}

#[test]
fn test_add() {
    let a = Summable::new(40u64);
    let b = Summable::new(2u64);
    let sum = &a + &b;
    assert_eq!(sum.cast_ref::<u64>(), Ok(&42));
    assert_eq!(a.cast_ref::<u64>(), Ok(&40));
    assert_eq!(b.cast_ref::<u64>(), Ok(&2));
    assert!(std::ptr::eq(sum.table().unwrap(), a.table().unwrap()));

    let owned = SmallAny::<16, StrictAdd>::new(1.5f32) + SmallAny::new(2.0f32);
    assert_eq!(owned.cast_ref::<f32>(), Ok(&3.5));

    assert!(matches!(
        a.try_add(&Summable::new(1u8)),
        Err(Error::TypeMismatch { op: "+", .. })
    ));
    assert!(matches!(a.try_add(&Summable::empty()), Err(Error::Empty { op: "+" })));
}

#[test]
fn test_strict_streamed() {
    type Printable = SmallAny<32, StrictStreamed>;

    assert_eq!(Printable::new(12).to_string(), "12");
    assert_eq!(Printable::from("hello").to_string(), "hello");
    assert_eq!(format!("<{:>4}>", Printable::new('x')), "<   x>");
    assert_eq!(Printable::empty().to_string(), "");
}

#[test]
fn test_streamed() {
    #[derive(Clone)]
    struct Point(i32, i32);
    impl Streamable for Point {
        fn stream(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "({}, {})", self.0, self.1)
        }
    }

    #[derive(Clone)]
    struct Hidden;
    impl Streamable for Hidden {}

    type Loose = SmallAny<16, Streamed>;
    let values = [Loose::new(1.5f32), Loose::new(Point(3, 4)), Loose::new(Hidden)];
    let text = values.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(text, ["1.5", "(3, 4)", ""]);
}

#[test]
fn test_streamed_std_containers() {
    type Loose = SmallAny<32, Streamed>;

    let values = [
        Loose::new(vec![1u8, 2]),
        Loose::new((3u16, 'c')),
        Loose::new([4u32; 4]),
        Loose::new(Some(5i8)),
        Loose::new(()),
        Loose::new(Box::<str>::from("boxed")),
        Loose::new(Rc::new(6u64)),
    ];
    let text = values.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(text, ["", "", "", "", "", "boxed", "6"]);
    assert_eq!(values[0].cast_ref::<Vec<u8>>(), Ok(&vec![1, 2]));
}

#[test]
fn test_variant() {
    type Restricted = SmallAny<0, Variant<Scalars, StrictEq>>;

    let mut a = Restricted::new(456_i32);
    assert!(a.inplace());
    a.set(String::from("text"));
    assert!(a.inplace());
    assert_eq!(a, Restricted::new(String::from("text")));
    a.set(7i64);
    assert_eq!(a.cast_ref::<i64>(), Ok(&7));
    assert_eq!(Restricted::in_place_capacity(), std::mem::size_of::<String>());
}

#[test]
fn test_inplace_only() {
    #[derive(Clone, Copy, PartialEq, Debug)]
    struct Pair(u8, u8);

    let mut a = SmallAny::<8, StrictInplace>::new(Pair(1, 2));
    assert!(a.inplace());
    assert_eq!(a.cast_ref::<Pair>(), Ok(&Pair(1, 2)));
    a.set(u64::MAX);
    assert!(a.inplace());
    assert_eq!(SmallAny::<8, StrictInplace>::in_place_capacity(), 8);
}

#[test]
fn test_combined() {
    type All = SmallAny<24, StrictLess<StrictEq<StrictHash<StrictStreamed<StrictAdd>>>>>;

    let a = All::new(25i64);
    let b = All::new(5i64);
    let sum = &a + &b;
    assert!(b < a);
    assert_eq!(sum, All::new(30i64));
    assert_eq!(sum.to_string(), "30");

    let mut seen = HashMap::new();
    seen.insert(sum, "thirty");
    assert_eq!(seen.get(&All::new(30i64)), Some(&"thirty"));
}
