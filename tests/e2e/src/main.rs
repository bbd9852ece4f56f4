use rpcli_e2e::bank;

fn main() {
    let matches = bank::bank_client_command().get_matches();
    bank::run_bank_client_command(&matches);
}
