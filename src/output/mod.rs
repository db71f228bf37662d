mod table;

pub(crate) use table::print_session_table;
