use fd_explorer_rs::scanner::{scan_table, AddrFamily};

// Shaped like a real /proc/<pid>/net/tcp, including the header line and a
// trailing newline.
const TCP_TABLE: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 0100007F:1A0A 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 24001 1 0000000000000000 100 0 0 10 0
   1: 0F02000A:A1B2 0101A8C0:01BB 01 00000000:00000000 00:00000000 00000000  1000        0 24002 1 0000000000000000 20 4 30 10 -1
   2: 0F02000A:A1B4 0101A8C0:01BB 01 00000000:00000000 00:00000000 00000000  1000        0 24003 1 0000000000000000 20 4 30 10 -1
";

#[test]
fn aggregates_identical_remotes_across_lines() {
    let scan = scan_table(TCP_TABLE, AddrFamily::V4);
    assert!(scan.skipped.is_empty());
    assert_eq!(scan.counters.len(), 2);

    let listen = &scan.counters["0.0.0.0_0_TCP_LISTEN"];
    assert_eq!(listen.count, 1);

    let established = &scan.counters["192.168.1.1_443_TCP_ESTABLISHED"];
    assert_eq!(established.count, 2);
}

#[test]
fn one_bad_line_does_not_abort_the_pass() {
    let text = TCP_TABLE.replace("0101A8C0:01BB 01 00000000:00000000 00:00000000 00000000  1000        0 24002", "0101A8C0:GGGG 01 00000000:00000000 00:00000000 00000000  1000        0 24002");
    let scan = scan_table(&text, AddrFamily::V4);
    assert_eq!(scan.skipped.len(), 1);
    assert_eq!(scan.skipped[0].error.token, "0101A8C0:GGGG");
    // The listen row and the surviving established row still aggregate.
    assert_eq!(scan.counters.len(), 2);
    assert_eq!(scan.counters["192.168.1.1_443_TCP_ESTABLISHED"].count, 1);
}

#[test]
fn tcp6_tables_use_the_wide_token_path() {
    let table = "  sl  local_address                         remote_address                        st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 00000000000000000000000001000000:1A0A 00000000000000000000000000000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 30001 1 0000000000000000 100 0 0 10 0
";
    let scan = scan_table(table, AddrFamily::V6);
    assert!(scan.skipped.is_empty());
    assert_eq!(scan.counters.len(), 1);
    assert!(scan.counters.contains_key("0.0.0.0_0_UNK"));
}

#[test]
fn empty_input_is_an_empty_pass() {
    let scan = scan_table("", AddrFamily::V4);
    assert!(scan.counters.is_empty());
    assert!(scan.skipped.is_empty());
}
