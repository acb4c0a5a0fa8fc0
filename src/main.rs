fn main() {
    exam_importer_lib::run()
}
