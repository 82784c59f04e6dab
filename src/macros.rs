// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, or vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // String concatenation shorthand!
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

#[macro_export]
macro_rules! record {
    // Record shorthand! Columns keep the order they are written in.
    //   record! { "Course" => "Math", "Grade" => "80" }
    () => {
        $crate::record::Record::new()
    };
    ($($col:expr => $val:expr),+ $(,)?) => {{
        let mut r = $crate::record::Record::new();
        $(
            r.insert($col, $val);
        )+
        r
    }};
}
