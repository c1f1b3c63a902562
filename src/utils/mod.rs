pub mod ieee80211;
pub mod pcap_writer;
